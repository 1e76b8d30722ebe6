//! Clock port - 時刻の抽象化
//!
//! イベント行のタイムスタンプ専用です。処理時間や poll 間隔の待機は tokio::time を使うので、
//! テストでは tokio の paused clock で進めます。

use chrono::{DateTime, Local, TimeZone};

/// Clock は現在時刻を提供
///
/// # テスト容易性
/// - trait により時刻を差し替え可能
/// - テストでは FixedClock を使用
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock (本番用).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always returns the same instant (テスト用).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Local>,
}

impl FixedClock {
    pub fn new<Tz: TimeZone>(at: DateTime<Tz>) -> Self {
        Self {
            at: at.with_timezone(&Local),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.at
    }
}
