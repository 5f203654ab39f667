use env_logger::{Builder, Env, Target};
use log::Level;
use std::io::Write;

/// 初始化 logger：輸出到 stdout，格式為 `<時間> [LEVEL] 訊息`
///
/// `RUST_LOG` 仍可覆寫預設層級。重複呼叫不會出錯。
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                buf.timestamp_seconds(),
                level_label(record.level()),
                record.args()
            )
        })
        .try_init();
}

const fn level_label(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
