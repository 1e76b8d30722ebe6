//! WorkerLoop - 1 worker 分の制御ループ
//!
//! # フロー
//! 1. active でなければ終了
//! 2. キュー先頭を取る（coordinator lock の中で worker の slot に載せる）
//! 3. 取れなければ stop / 投入通知 / poll 間隔 のどれか早いものを待つ
//! 4. 取れたら stop と処理時間を競わせる
//!    - stop が先: そのまま終了（Item は remover がキューの先頭に戻す）
//!    - 処理時間が先: completed に移して 1 に戻る

use std::sync::{Arc, Weak};

use tokio::sync::{Notify, watch};
use tracing::debug;

use super::coordinator::Shared;
use super::worker::Worker;

pub(crate) async fn run(
    shared: Weak<Shared>,
    submitted: Arc<Notify>,
    worker: Arc<Worker>,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        if !worker.is_active().await {
            break;
        }
        // pick_up より前に登録しておく（空振り直後の投入通知を取りこぼさない）
        let notified = submitted.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        // coordinator が全部 drop されていたら抜ける
        let Some(center) = shared.upgrade() else {
            break;
        };
        let poll_interval = center.config.poll_interval;
        let processing_time = center.config.processing_time;
        let picked = center.pick_up(&worker).await;
        // 待機中・処理中は Arc を持たない（最後のハンドルが消えたときに Shared が drop できるように）
        drop(center);

        let Some((item, class)) = picked else {
            let woken = tokio::select! {
                _ = stop_rx.changed() => break,
                _ = &mut notified => "submission",
                _ = tokio::time::sleep(poll_interval) => "poll",
            };
            debug!(woken, "idle wake-up");
            continue;
        };

        debug!(item = item.get(), %class, "processing");
        tokio::select! {
            _ = stop_rx.changed() => {
                debug!(item = item.get(), "interrupted");
                break;
            }
            _ = tokio::time::sleep(processing_time) => {
                let Some(center) = shared.upgrade() else {
                    break;
                };
                center.complete(&worker).await;
            }
        }
    }
    debug!("worker loop exited");
}
