use crate::core::ConnectionStatus;
use crate::utils::error::{Result, TrailError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Wallet whose account is known up front (from configuration). The connect
/// prompt succeeds only when an account was configured.
#[derive(Debug)]
pub struct PresetWallet {
    account: Option<String>,
    connected: AtomicBool,
}

impl PresetWallet {
    pub fn new(account: Option<String>, connected: bool) -> Self {
        let connected = connected && account.is_some();
        Self {
            account,
            connected: AtomicBool::new(connected),
        }
    }

    pub fn disconnected() -> Self {
        Self::new(None, false)
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }
}

#[async_trait]
impl ConnectionStatus for PresetWallet {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn request_connect(&self) -> Result<()> {
        match &self.account {
            Some(account) => {
                tracing::debug!("Connecting preset account {}", account);
                self.connected.store(true, Ordering::SeqCst);
                Ok(())
            }
            None => Err(TrailError::WalletRejected {
                message: "no wallet account configured".to_string(),
            }),
        }
    }
}
