//! Server state shared by the handlers.

use crate::{client::ClientConfig, hub::HubHandle};

/// Shared application state
pub struct AppState {
    /// Hub（クライアント管理とブロードキャストの窓口）
    pub hub: HubHandle,
    /// 各接続に適用する keepalive・バッファ設定
    pub client_config: ClientConfig,
}
