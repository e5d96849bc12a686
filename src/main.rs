use clap::Parser;
use tracing_subscriber::EnvFilter;

use heat_pump_matching_toolbox::{app, config};

/// 프로그램의 엔트리 포인트. 로깅과 설정을 준비한 뒤 명령을 실행한다.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = app::Cli::parse();
    if let Err(err) = try_run(&cli) {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run(cli: &app::Cli) -> Result<(), app::AppError> {
    let cfg = config::load_or_default(&cli.config)?;
    let output = app::run(cli, &cfg)?;
    println!("{output}");
    Ok(())
}
