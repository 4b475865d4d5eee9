use clap::Parser;
use heritage_trail::core::map::{ClickAction, ClickMode, MapFeature};
use heritage_trail::core::SiteId;
use heritage_trail::utils::error::ErrorSeverity;
use heritage_trail::utils::{logger, validation::Validate};
use heritage_trail::app::NarrationReport;
use heritage_trail::{build_session, AppSession, CliConfig, Command, TrailError};
use std::sync::Arc;
use tokio::task::JoinSet;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting heritage-trail");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let session = match build_session(&config).await {
        Ok(session) => session,
        Err(e) => exit_with(e),
    };

    let result = match cli.command {
        Command::Sites {
            zoom,
            no_cluster,
            json,
        } => list_sites(session, zoom, no_cluster, json),
        Command::Narrate { ids } => narrate(session, ids).await,
        Command::Details { id } => details(session, SiteId(id)),
        Command::Click { id, details } => click(session, SiteId(id), details).await,
        Command::Start => start(session).await,
    };

    if let Err(e) = result {
        exit_with(e);
    }
    Ok(())
}

fn exit_with(e: TrailError) -> ! {
    tracing::error!(
        "❌ heritage-trail failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn print_notices(session: &AppSession) {
    for notice in session.drain_notices() {
        eprintln!("⚠️  {}", notice.message);
    }
}

fn list_sites(
    mut session: AppSession,
    zoom: Option<u8>,
    no_cluster: bool,
    json: bool,
) -> heritage_trail::Result<()> {
    if let Some(zoom) = zoom {
        session.renderer_mut().set_zoom(zoom);
    }
    if no_cluster {
        session.renderer_mut().set_clustering(false);
    }

    let features = session.features();
    if json {
        println!("{}", serde_json::to_string_pretty(&features)?);
        return Ok(());
    }

    println!(
        "🗺️  {} sites ({:?} catalog), zoom {}",
        session.catalog().len(),
        session.catalog().origin(),
        session.renderer().view().zoom
    );
    for feature in features {
        match feature {
            MapFeature::Single(marker) => println!(
                "  ● #{:<3} {:<28} ({:.4}, {:.4})  {}",
                marker.site_id,
                marker.name,
                marker.position.lat,
                marker.position.lng,
                marker.color.hex()
            ),
            MapFeature::Cluster(group) => println!(
                "  ◎ {} sites around ({:.4}, {:.4}), expands at zoom {}",
                group.members.len(),
                group.center.lat,
                group.center.lng,
                group.expansion_zoom
            ),
        }
    }
    Ok(())
}

async fn narrate(session: AppSession, ids: Vec<u64>) -> heritage_trail::Result<()> {
    let session = Arc::new(session);
    let mut tasks = JoinSet::new();
    for id in ids {
        let session = session.clone();
        tasks.spawn(async move { (SiteId(id), session.narrate(SiteId(id)).await) });
    }

    let mut report = NarrationReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((id, result)) => report.record(id, result),
            Err(e) => tracing::error!("Narration task panicked: {}", e),
        }
    }

    for id in &report.unlocked {
        println!("🔓 Site {} unlocked", id);
    }
    for id in &report.replayed {
        println!("🔊 Site {} narrated again", id);
    }
    for (id, e) in &report.failed {
        println!("🔒 Site {} still locked: {}", id, e);
    }

    print_notices(&session);
    let unlocks = session.unlocks();
    for marker in session.markers().iter().filter(|m| unlocks.contains(m.site_id)) {
        println!("  ● {} {}", marker.name, marker.color.hex());
    }

    // 等待播放結束，暫存音檔才會被釋放
    session.wait_for_playback().await;

    if !report.failed.is_empty() {
        tracing::warn!("{} narration(s) failed", report.failed.len());
    }
    report.into_result()
}

fn details(mut session: AppSession, id: SiteId) -> heritage_trail::Result<()> {
    session.back_to_map();
    let details = session.select_place(id)?;

    println!("📍 {}", details.name);
    println!("   Location: {}", details.location);
    println!("   Rating:   {}", details.rating);
    println!("   Timing:   {}", details.timing);
    if let Some(image) = &details.image {
        println!("   Image:    {}", image.display());
    }
    println!();
    println!("{}", details.description);

    session.back_to_map();
    Ok(())
}

async fn click(mut session: AppSession, id: SiteId, details: bool) -> heritage_trail::Result<()> {
    if details {
        session.renderer_mut().set_click_mode(ClickMode::ShowDetails);
    }
    session.get_started().await?;

    let result = session.click_marker(id).await;
    print_notices(&session);
    match result? {
        ClickAction::Narrate(site) => println!("🔓 {} unlocked", site.name),
        ClickAction::ShowDetails(site) => println!(
            "📍 {} ({:?})",
            site.name,
            session.shell().current()
        ),
        ClickAction::Delegated => {}
        ClickAction::Ignored => println!("No site {} on the map", id),
    }

    session.wait_for_playback().await;
    Ok(())
}

async fn start(mut session: AppSession) -> heritage_trail::Result<()> {
    let result = session.get_started().await;
    print_notices(&session);
    result?;
    println!("✅ {:?} is open, {} sites to discover", session.shell().current(), session.catalog().len());
    Ok(())
}
