//! UseCase: イベント配信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PublishEventUseCase::execute() メソッド
//! - event type の検証、JSON エンベロープの生成、ブロードキャストの呼び出し
//!
//! ### なぜこのテストが必要か
//! - アプリケーション層からハブへの唯一の入口
//! - 不正な event type がクライアントに届かないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：イベントが 1 回だけブロードキャストされる
//! - 異常系：空の event type
//! - エッジケース：接続中のクライアントが 0 人

use std::sync::Arc;

use rest_websockets_shared::time::Clock;
use serde::Serialize;

use crate::domain::{Broadcaster, Event, EventType};

use super::error::PublishError;

/// Result of a publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublishReceipt {
    /// Clients connected just before the event was handed to the hub.
    ///
    /// Delivery happens later inside the hub loop, so a client joining or
    /// being evicted in between is not reflected here.
    pub listeners: usize,
}

/// イベント配信のユースケース
pub struct PublishEventUseCase {
    broadcaster: Arc<dyn Broadcaster>,
    clock: Arc<dyn Clock>,
}

impl PublishEventUseCase {
    pub fn new(broadcaster: Arc<dyn Broadcaster>, clock: Arc<dyn Clock>) -> Self {
        Self { broadcaster, clock }
    }

    /// イベント配信を実行
    ///
    /// # Arguments
    ///
    /// * `event_type` - イベント名（例: `post_created`）
    /// * `payload` - クライアントにそのまま渡される JSON
    ///
    /// # Returns
    ///
    /// * `Ok(PublishReceipt)` - ハブへの受け渡し成功
    /// * `Err(PublishError)` - event type が不正、またはエンコード失敗
    pub async fn execute(
        &self,
        event_type: String,
        payload: serde_json::Value,
    ) -> Result<PublishReceipt, PublishError> {
        let event = Event::new(EventType::new(event_type)?, payload, self.clock.now_millis());
        let encoded = serde_json::to_string(&event)?;

        let listeners = self.broadcaster.connection_count().await;
        self.broadcaster.broadcast(encoded.into());

        tracing::info!(
            event_type = event.event_type.as_str(),
            listeners,
            "Event published"
        );

        Ok(PublishReceipt { listeners })
    }
}
