//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::frame_csv::write_frame_csv;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::domain::dashboard::{build_dashboard, resolve_tickers, select_ticker, Dashboard};
use crate::domain::error::StockscopeError;
use crate::domain::settings::{DataSource, Settings};
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stockscope", about = "Stock price indicator dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute indicators for a ticker and write the HTML dashboard
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticker: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the indicator table as CSV
    Table {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticker: Option<String>,
        /// Defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the tickers the dashboard offers
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file and print the resolved settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            config,
            ticker,
            output,
        } => run_analyze(&config, ticker.as_deref(), output.as_ref()),
        Command::Table {
            config,
            ticker,
            output,
        } => run_table(&config, ticker.as_deref(), output.as_ref()),
        Command::ListTickers { config } => run_list_tickers(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Serve { config } => run_serve(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_settings(path: &PathBuf) -> Result<Settings, StockscopeError> {
    info!("Loading config from {}", path.display());
    let config = FileConfigAdapter::from_file(path)?;
    Settings::from_config(&config)
}

pub fn build_data_port(
    settings: &Settings,
) -> Result<Box<dyn MarketDataPort + Send + Sync>, StockscopeError> {
    match settings.source {
        DataSource::Csv => Ok(Box::new(CsvAdapter::new(settings.data_dir.clone()))),
        #[cfg(feature = "yahoo")]
        DataSource::Yahoo => Ok(Box::new(crate::adapters::yahoo_adapter::YahooAdapter::new()?)),
        #[cfg(not(feature = "yahoo"))]
        DataSource::Yahoo => Err(StockscopeError::config_invalid(
            "data",
            "source",
            "yahoo requires building with the `yahoo` feature",
        )),
    }
}

fn load_dashboard(
    config_path: &PathBuf,
    ticker: Option<&str>,
) -> Result<(Settings, Dashboard), StockscopeError> {
    let settings = load_settings(config_path)?;
    let data_port = build_data_port(&settings)?;
    let tickers = resolve_tickers(&settings, data_port.as_ref());
    let ticker = select_ticker(ticker, &tickers).ok_or_else(|| StockscopeError::ConfigMissing {
        section: "dashboard".into(),
        key: "tickers".into(),
    })?;

    let dashboard = build_dashboard(data_port.as_ref(), &ticker, &tickers, &settings)?;
    Ok((settings, dashboard))
}

fn run_analyze(
    config_path: &PathBuf,
    ticker: Option<&str>,
    output_path: Option<&PathBuf>,
) -> Result<(), StockscopeError> {
    let (settings, dashboard) = load_dashboard(config_path, ticker)?;
    let output = output_path.cloned().unwrap_or(settings.output);

    HtmlReportAdapter::new().write(&dashboard, &output)?;
    info!("Dashboard for {} written to {}", dashboard.ticker, output.display());
    Ok(())
}

fn run_table(
    config_path: &PathBuf,
    ticker: Option<&str>,
    output_path: Option<&PathBuf>,
) -> Result<(), StockscopeError> {
    let (_, dashboard) = load_dashboard(config_path, ticker)?;

    match output_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            write_frame_csv(&dashboard.frame, File::create(path)?)?;
            info!("Table for {} written to {}", dashboard.ticker, path.display());
        }
        None => write_frame_csv(&dashboard.frame, io::stdout().lock())?,
    }
    Ok(())
}

fn run_list_tickers(config_path: &PathBuf) -> Result<(), StockscopeError> {
    let settings = load_settings(config_path)?;
    let data_port = build_data_port(&settings)?;

    for ticker in resolve_tickers(&settings, data_port.as_ref()) {
        println!("{}", ticker);
    }
    Ok(())
}

fn run_validate(config_path: &PathBuf) -> Result<(), StockscopeError> {
    let settings = load_settings(config_path)?;
    let windows: Vec<String> = settings
        .indicators
        .ma_windows
        .iter()
        .map(|w| w.to_string())
        .collect();

    println!("Configuration is valid.");
    println!("  source:         {}", settings.source);
    if settings.source == DataSource::Csv {
        println!("  data_dir:       {}", settings.data_dir.display());
    }
    println!("  tickers:        {}", settings.tickers_or_default().join(", "));
    println!("  range:          {} to {}", settings.start_date, settings.end_date);
    println!("  ma_windows:     {}", windows.join(", "));
    println!("  rsi_window:     {}", settings.indicators.rsi_window);
    println!(
        "  thresholds:     overbought > {}, oversold < {}",
        settings.indicators.thresholds.overbought, settings.indicators.thresholds.oversold
    );
    println!("  histogram_bins: {}", settings.histogram_bins);
    println!("  output:         {}", settings.output.display());
    println!("  listen:         {}", settings.listen);
    Ok(())
}

fn run_serve(config_path: &PathBuf) -> Result<(), StockscopeError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use std::net::SocketAddr;
        use std::sync::Arc;

        let settings = load_settings(config_path)?;
        let data_port: Arc<dyn MarketDataPort + Send + Sync> = Arc::from(build_data_port(&settings)?);
        let tickers = resolve_tickers(&settings, data_port.as_ref());

        let addr: SocketAddr = settings.listen.parse().map_err(|e| {
            StockscopeError::config_invalid("web", "listen", format!("invalid address: {}", e))
        })?;

        let router = build_router(AppState {
            data_port,
            settings,
            tickers,
        });

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Serving dashboard on http://{}", addr);
            axum::serve(listener, router).await
        })?;
        Ok(())
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        Err(StockscopeError::config_invalid(
            "web",
            "listen",
            "serve requires building with the `web` feature",
        ))
    }
}
