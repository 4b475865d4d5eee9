use crate::domain::model::HeritageSite;

/// Sites shown when the catalog endpoint cannot be reached, so the map is never empty.
const FALLBACK_SITES: &[(u64, &str, f64, f64)] = &[
    (1, "Victoria Memorial", 22.5448, 88.3426),
    (2, "Howrah Bridge", 22.5850, 88.3478),
    (3, "Indian Museum", 22.5570, 88.3514),
    (4, "Marble Palace", 22.6231, 88.3616),
    (5, "Birla Planetarium", 22.5513, 88.3478),
    (6, "St. Paul's Cathedral", 22.5466, 88.3473),
    (7, "Kalighat Temple", 22.5185, 88.3427),
    (8, "Dakshineswar Temple", 22.6451, 88.3675),
    (9, "Belur Math", 22.6294, 88.3635),
    (10, "Jorasanko Thakur Bari", 22.5850, 88.3576),
    (11, "National Library", 22.5314, 88.3355),
    (12, "Alipore Zoo", 22.5346, 88.3322),
    (13, "Science City", 22.5744, 88.4155),
    (14, "Eco Park", 22.6269, 88.4497),
    (15, "Nicco Park", 22.6100, 88.4378),
    (16, "Fort William", 22.5656, 88.3427),
    (17, "Raj Bhavan", 22.5516, 88.3444),
    (18, "Writers' Building", 22.5716, 88.3444),
    (19, "General Post Office", 22.5696, 88.3444),
    (20, "High Court", 22.5716, 88.3427),
    (21, "Rashtrapati Bhavan", 22.5696, 88.3427),
    (22, "Town Hall", 22.5696, 88.3444),
    (23, "Metcalfe Hall", 22.5716, 88.3444),
    (24, "Asiatic Society", 22.5716, 88.3444),
    (25, "St. John's Church", 22.5716, 88.3444),
    (26, "St. James' Church", 22.5716, 88.3444),
    (27, "Armenian Church", 22.5716, 88.3444),
    (28, "Portuguese Church", 22.5716, 88.3444),
    (29, "Nakhoda Mosque", 22.5716, 88.3444),
    (30, "Tipu Sultan Mosque", 22.5716, 88.3444),
    (31, "Beth El Synagogue", 22.5716, 88.3444),
    (32, "Maghen David Synagogue", 22.5716, 88.3444),
    (33, "Pareshnath Temple", 22.5716, 88.3444),
    (34, "Chinese Temple", 22.5716, 88.3444),
    (35, "Jain Temple", 22.5716, 88.3444),
    (36, "Parsi Fire Temple", 22.5716, 88.3444),
    (37, "South Park Street Cemetery", 22.5716, 88.3444),
    (38, "North Park Street Cemetery", 22.5716, 88.3444),
    (39, "Burrabazar", 22.5716, 88.3444),
    (40, "New Market", 22.5716, 88.3444),
    (41, "College Street", 22.5716, 88.3444),
    (42, "Bow Barracks", 22.5716, 88.3444),
    (43, "Chinatown", 22.5716, 88.3444),
    (44, "Black Town", 22.5716, 88.3444),
    (45, "White Town", 22.5716, 88.3444),
    (46, "Dalhousie Square", 22.5716, 88.3444),
    (47, "Lal Dighi", 22.5716, 88.3444),
    (48, "Maidan", 22.5716, 88.3444),
    (49, "Race Course", 22.5716, 88.3444),
    (50, "Royal Calcutta Turf Club", 22.5716, 88.3444),
];

pub fn fallback_sites() -> Vec<HeritageSite> {
    FALLBACK_SITES
        .iter()
        .map(|&(id, name, lat, lng)| HeritageSite::new(id, name, lat, lng))
        .collect()
}

pub fn fallback_len() -> usize {
    FALLBACK_SITES.len()
}
