//! CLI integration tests: INI files and CSV data on disk driven through
//! the command dispatch.

mod common;

use clap::Parser;
use common::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use stockscope::cli::{self, Cli};
use stockscope::domain::dashboard::resolve_tickers;
use stockscope::domain::error::StockscopeError;
use stockscope::domain::settings::DataSource;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Data directory with AAPL and MSFT, plus an INI pointing at it.
fn setup(extra: &str) -> (tempfile::TempDir, tempfile::NamedTempFile) {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "AAPL", &generate_wave("2024-01-01", 90, 180.0));
    write_csv(dir.path(), "MSFT", &generate_bars("2024-01-01", 30, 400.0));

    let ini = format!(
        "[data]\nsource = csv\ndata_dir = {}\n\n[dashboard]\nstart_date = 2024-01-01\nend_date = 2024-12-31\n{}",
        dir.path().display(),
        extra
    );
    (dir, write_temp_ini(&ini))
}

fn run(args: &[&str]) -> ExitCode {
    let mut argv = vec!["stockscope"];
    argv.extend_from_slice(args);
    cli::run(Cli::parse_from(argv))
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

mod settings_tests {
    use super::*;

    #[test]
    fn full_config_resolves() {
        let ini = write_temp_ini(
            r#"
[data]
source = csv
data_dir = prices

[dashboard]
tickers = aapl, msft
start_date = 2020-01-01
end_date = 2020-12-31

[indicators]
ma_windows = 5, 50
rsi_window = 9
overbought = 80
oversold = 20

[report]
output = out/report.html
histogram_bins = 25

[web]
listen = 0.0.0.0:8080
"#,
        );
        let settings = cli::load_settings(&ini.path().to_path_buf()).unwrap();

        assert_eq!(settings.source, DataSource::Csv);
        assert_eq!(settings.tickers, Some(vec!["AAPL".to_string(), "MSFT".to_string()]));
        assert_eq!(settings.start_date, date(2020, 1, 1));
        assert_eq!(settings.indicators.ma_windows, vec![5, 50]);
        assert_eq!(settings.indicators.rsi_window, 9);
        assert_eq!(settings.indicators.thresholds.overbought, 80.0);
        assert_eq!(settings.histogram_bins, 25);
        assert_eq!(settings.output, Path::new("out/report.html"));
        assert_eq!(settings.listen, "0.0.0.0:8080");
    }

    #[test]
    fn invalid_range_rejected() {
        let ini = write_temp_ini("[dashboard]\nstart_date = 2024-05-31\nend_date = 2014-05-31\n");
        let err = cli::load_settings(&ini.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigInvalid { .. }));
    }

    #[test]
    fn csv_tickers_discovered_from_data_dir() {
        let (_dir, ini) = setup("");
        let settings = cli::load_settings(&ini.path().to_path_buf()).unwrap();
        let port = cli::build_data_port(&settings).unwrap();

        assert_eq!(resolve_tickers(&settings, port.as_ref()), vec!["AAPL", "MSFT"]);
    }
}

mod command_tests {
    use super::*;

    #[test]
    fn analyze_writes_dashboard() {
        let (dir, ini) = setup("");
        let output = dir.path().join("site/aapl.html");

        let code = run(&["analyze", "-c", path_str(ini.path()), "-o", path_str(&output)]);

        assert_eq!(code, ExitCode::SUCCESS);
        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("AAPL Stock Dashboard"));
        assert!(html.contains("RSI with Overbought and Oversold Signals"));
    }

    #[test]
    fn analyze_selected_ticker() {
        let (dir, ini) = setup("");
        let output = dir.path().join("msft.html");

        let code = run(&[
            "analyze",
            "-c",
            path_str(ini.path()),
            "--ticker",
            "msft",
            "-o",
            path_str(&output),
        ]);

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(fs::read_to_string(&output).unwrap().contains("MSFT Stock Dashboard"));
    }

    #[test]
    fn analyze_uses_configured_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("from_config.html");
        let (_data, ini) = setup(&format!("\n[report]\noutput = {}\n", output.display()));

        assert_eq!(run(&["analyze", "-c", path_str(ini.path())]), ExitCode::SUCCESS);
        assert!(output.exists());
    }

    #[test]
    fn missing_ticker_exits_with_data_code() {
        let (dir, ini) = setup("");
        let output = dir.path().join("none.html");

        let code = run(&[
            "analyze",
            "-c",
            path_str(ini.path()),
            "-t",
            "ZZZZ",
            "-o",
            path_str(&output),
        ]);

        assert_eq!(code, ExitCode::from(3));
        assert!(!output.exists());
    }

    #[test]
    fn lower_case_csv_file_is_served() {
        let (dir, ini) = setup("");
        write_csv(dir.path(), "nflx", &generate_bars("2024-01-01", 25, 600.0));
        let output = dir.path().join("nflx.html");

        let settings = cli::load_settings(&ini.path().to_path_buf()).unwrap();
        let port = cli::build_data_port(&settings).unwrap();
        assert_eq!(
            resolve_tickers(&settings, port.as_ref()),
            vec!["AAPL", "MSFT", "NFLX"]
        );

        let code = run(&[
            "analyze",
            "-c",
            path_str(ini.path()),
            "-t",
            "nflx",
            "-o",
            path_str(&output),
        ]);

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(fs::read_to_string(&output).unwrap().contains("NFLX Stock Dashboard"));
    }

    #[test]
    fn table_writes_csv() {
        let (dir, ini) = setup("\n[indicators]\nma_windows = 5\n");
        let output = dir.path().join("msft.csv");

        let code = run(&["table", "-c", path_str(ini.path()), "-t", "MSFT", "-o", path_str(&output)]);

        assert_eq!(code, ExitCode::SUCCESS);
        let text = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "date,open,high,low,close,volume,MA5,DailyReturn,CumulativeReturn,RSI,Signal"
        );
        assert_eq!(lines.len(), 31);
        // strictly rising closes: RSI pinned at 100 once defined
        assert!(lines[30].ends_with(",100,Overbought"));
    }

    #[test]
    fn validate_accepts_good_config() {
        let (_dir, ini) = setup("");
        assert_eq!(run(&["validate", "-c", path_str(ini.path())]), ExitCode::SUCCESS);
    }

    #[test]
    fn validate_rejects_bad_thresholds() {
        let ini = write_temp_ini("[indicators]\noverbought = 20\noversold = 80\n");
        assert_eq!(run(&["validate", "-c", path_str(ini.path())]), ExitCode::from(2));
    }

    #[test]
    fn list_tickers_succeeds() {
        let (_dir, ini) = setup("tickers = IBM\n");
        assert_eq!(run(&["list-tickers", "-c", path_str(ini.path())]), ExitCode::SUCCESS);
    }
}
