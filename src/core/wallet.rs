use crate::core::shell::ModalShell;
use crate::core::ConnectionStatus;
use crate::utils::error::Result;

/// Decides whether "get started" may open the map right away.
pub struct WalletGate<C: ConnectionStatus> {
    status: C,
    required: bool,
}

impl<C: ConnectionStatus> WalletGate<C> {
    pub fn new(status: C, required: bool) -> Self {
        Self { status, required }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_open(&self) -> bool {
        !self.required || self.status.is_connected()
    }

    /// Opens the map, prompting for a wallet first when the gate demands one.
    /// On rejection the shell is put back exactly as it was.
    pub async fn get_started(&self, shell: &mut ModalShell) -> Result<()> {
        if self.is_open() {
            shell.open_map();
            return Ok(());
        }

        let before = shell.clone();
        shell.open_wallet_login();
        tracing::info!("👛 Wallet required, showing connect prompt");

        match self.status.request_connect().await {
            Ok(()) => {
                tracing::info!("Wallet connected");
                shell.open_map();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Wallet connection failed: {}", e);
                shell.restore(before);
                Err(e)
            }
        }
    }
}
