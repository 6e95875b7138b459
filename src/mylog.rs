//! ログ出力の設定。

use log::LevelFilter;

/// stderr に "[LEVEL target] message" の形式で出力するロガーを設定する。
pub fn init_logger(level: LevelFilter) -> anyhow::Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}
