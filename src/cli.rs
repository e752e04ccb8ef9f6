//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::paper_broker::PaperBroker;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, RunReport};
use crate::domain::config_validation::{
    parse_optional_date, validate_backtest_config, validate_strategy_params,
};
use crate::domain::error::SigtraderError;
use crate::domain::events::TracingSink;
use crate::domain::indicator::{Smoothing, StochasticParams};
use crate::domain::strategy::{MacdParams, RsiParams, Strategy, StrategyKind, StrategyParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Long-only trading signal backtester")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one strategy over a CSV feed
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [backtest] data_path
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Overrides [strategy] kind
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List strategy kinds and their default parameters
    Strategies,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data,
            strategy,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, data.as_ref(), strategy.as_deref())
            } else {
                run_backtest(&config, data.as_ref(), strategy.as_deref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Strategies => run_strategies(),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Config, backtest settings and strategy parameters, validated.
fn prepare(
    config_path: &PathBuf,
    data_override: Option<&PathBuf>,
    kind_override: Option<&str>,
) -> Result<(BacktestConfig, StrategyParams, bool), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    let resolved = validate_backtest_config(&adapter)
        .and_then(|()| build_backtest_config(&adapter))
        .and_then(|bt| {
            let params = build_strategy_params(&adapter, kind_override)?;
            validate_strategy_params(&params)?;
            Ok((bt, params))
        });
    let (mut bt_config, params) = match resolved {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
    };

    if let Some(path) = data_override {
        bt_config.data_path = path.clone();
    } else if !adapter.has_key("backtest", "data_path") {
        let err = SigtraderError::ConfigMissing {
            section: "backtest".into(),
            key: "data_path".into(),
        };
        eprintln!("error: {err}");
        return Err((&err).into());
    }

    Ok((bt_config, params, printlog(&adapter)))
}

/// Per-bar event logging is opt-in.
fn printlog(adapter: &dyn ConfigPort) -> bool {
    adapter.get_bool("strategy", "printlog", false)
}

fn run_backtest(
    config_path: &PathBuf,
    data_override: Option<&PathBuf>,
    kind_override: Option<&str>,
) -> ExitCode {
    let (bt_config, params, printlog) = match prepare(config_path, data_override, kind_override) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let data_port = CsvAdapter::new(PathBuf::from("."))
        .reversed(bt_config.reverse)
        .adjusted(bt_config.adjclose);
    let source = bt_config.data_path.to_string_lossy();
    let bars = match data_port.fetch_bars(&source, bt_config.start_date, bt_config.end_date) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    info!(bars = bars.len(), source = %source, "Feed loaded");

    eprintln!("Running {} over {} bars", params, bars.len());
    let mut strategy = Strategy::new(params);
    let mut broker = PaperBroker::new(
        bt_config.initial_cash,
        bt_config.sizer_percent,
        bt_config.commission,
    );
    let mut sink = TracingSink::new(printlog);

    match backtest_engine::run(&bars, &mut strategy, &mut broker, &mut sink) {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn print_summary(report: &RunReport) {
    let wins = report.trades.iter().filter(|t| t.net > 0.0).count();
    eprintln!("\n=== {} ===", report.strategy);
    eprintln!("Starting Value:   {:.2}", report.start_value);
    eprintln!("Final Value:      {:.2}", report.final_value);
    eprintln!("Total Return:     {:.2}%", report.total_return() * 100.0);
    eprintln!("Max Drawdown:     -{:.1}%", report.max_drawdown() * 100.0);
    eprintln!("Orders Sent:      {}", report.orders().count());
    eprintln!("Fills:            {}", report.completed_fills());
    eprintln!("Closed Trades:    {} ({} profitable)", report.trades.len(), wins);
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SigtraderError> {
    let defaults = BacktestConfig::default();
    Ok(BacktestConfig {
        data_path: adapter
            .get_string("backtest", "data_path")
            .map(|p| PathBuf::from(p.trim()))
            .unwrap_or_default(),
        reverse: adapter.get_bool("backtest", "reverse", false),
        adjclose: adapter.get_bool("backtest", "adjclose", defaults.adjclose),
        start_date: parse_optional_date(adapter, "start_date")?,
        end_date: parse_optional_date(adapter, "end_date")?,
        initial_cash: adapter.get_double("backtest", "initial_cash", defaults.initial_cash),
        sizer_percent: adapter.get_double("backtest", "sizer_percent", defaults.sizer_percent),
        commission: adapter.get_double("backtest", "commission", defaults.commission),
    })
}

fn period(adapter: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, SigtraderError> {
    let value = adapter.get_int("strategy", key, default as i64);
    if value <= 0 {
        return Err(SigtraderError::invalid(
            "strategy",
            key,
            format!("{} must be positive, got {}", key, value),
        ));
    }
    Ok(value as usize)
}

fn smoothing(adapter: &dyn ConfigPort, default: Smoothing) -> Result<Smoothing, SigtraderError> {
    match adapter.get_string("strategy", "smoothing") {
        None => Ok(default),
        Some(s) => match s.trim().to_lowercase().as_str() {
            "" => Ok(default),
            "ema" | "exponential" => Ok(Smoothing::Exponential),
            "wilder" | "smma" => Ok(Smoothing::Wilder),
            other => Err(SigtraderError::invalid(
                "strategy",
                "smoothing",
                format!("expected ema or wilder, got '{}'", other),
            )),
        },
    }
}

fn macd_params(adapter: &dyn ConfigPort) -> Result<MacdParams, SigtraderError> {
    let d = MacdParams::default();
    Ok(MacdParams {
        fast: period(adapter, "fast_period", d.fast)?,
        slow: period(adapter, "slow_period", d.slow)?,
        signal: period(adapter, "signal_period", d.signal)?,
    })
}

fn stochastic_params(adapter: &dyn ConfigPort) -> Result<StochasticParams, SigtraderError> {
    let d = StochasticParams::default();
    Ok(StochasticParams {
        period: period(adapter, "k_period", d.period)?,
        d_period: period(adapter, "period_dfast", d.d_period)?,
        k_smoothing: period(adapter, "k_smoothing", d.k_smoothing)?,
        safediv: adapter.get_bool("strategy", "safediv", d.safediv),
        safe_value: adapter.get_double("strategy", "safe_value", d.safe_value),
    })
}

/// Resolve `[strategy]` into parameters for one kind. Keys that are absent
/// take the kind's defaults; keys that belong to other kinds are ignored.
pub fn build_strategy_params(
    adapter: &dyn ConfigPort,
    kind_override: Option<&str>,
) -> Result<StrategyParams, SigtraderError> {
    let kind_str = match kind_override {
        Some(k) => k.to_string(),
        None => adapter
            .get_string("strategy", "kind")
            .ok_or_else(|| SigtraderError::ConfigMissing {
                section: "strategy".into(),
                key: "kind".into(),
            })?,
    };
    let kind: StrategyKind = kind_str.parse()?;

    let params = match StrategyParams::defaults(kind) {
        StrategyParams::BuyAndHold => StrategyParams::BuyAndHold,
        StrategyParams::Sma { period: p } => StrategyParams::Sma {
            period: period(adapter, "period", p)?,
        },
        StrategyParams::Cma { period: p } => StrategyParams::Cma {
            period: period(adapter, "period", p)?,
        },
        StrategyParams::Vwap { period: p, k } => StrategyParams::Vwap {
            period: period(adapter, "period", p)?,
            k: adapter.get_double("strategy", "k", k),
        },
        StrategyParams::Bollinger {
            period: p,
            devfactor,
        } => StrategyParams::Bollinger {
            period: period(adapter, "period", p)?,
            devfactor: adapter.get_double("strategy", "devfactor", devfactor),
        },
        StrategyParams::Turtle { n_high, n_low } => StrategyParams::Turtle {
            n_high: period(adapter, "n_high", n_high)?,
            n_low: period(adapter, "n_low", n_low)?,
        },
        StrategyParams::MacdV1(_) => StrategyParams::MacdV1(macd_params(adapter)?),
        StrategyParams::MacdV2(_) => StrategyParams::MacdV2(macd_params(adapter)?),
        StrategyParams::KdjV1(_) => StrategyParams::KdjV1(stochastic_params(adapter)?),
        StrategyParams::KdjV2(_) => StrategyParams::KdjV2(stochastic_params(adapter)?),
        StrategyParams::Rsi(d) => StrategyParams::Rsi(RsiParams {
            period: period(adapter, "period", d.period)?,
            kbuy: adapter.get_double("strategy", "kbuy", d.kbuy),
            ksell: adapter.get_double("strategy", "ksell", d.ksell),
            smoothing: smoothing(adapter, d.smoothing)?,
            safediv: adapter.get_bool("strategy", "safediv", d.safediv),
        }),
    };
    Ok(params)
}

pub fn run_dry_run(
    config_path: &PathBuf,
    data_override: Option<&PathBuf>,
    kind_override: Option<&str>,
) -> ExitCode {
    let (bt_config, params, printlog) = match prepare(config_path, data_override, kind_override) {
        Ok(p) => p,
        Err(code) => return code,
    };
    eprintln!("Config validated successfully");

    eprintln!("\nStrategy:");
    eprintln!("  {}", params);
    eprintln!("  printlog: {}", printlog);

    eprintln!("\nBacktest:");
    eprintln!("  data:          {}", bt_config.data_path.display());
    eprintln!("  reverse:       {}", bt_config.reverse);
    eprintln!("  adjclose:      {}", bt_config.adjclose);
    eprintln!(
        "  range:         {} to {}",
        bt_config
            .start_date
            .map_or_else(|| "start".to_string(), |d| d.to_string()),
        bt_config
            .end_date
            .map_or_else(|| "end".to_string(), |d| d.to_string()),
    );
    eprintln!("  initial_cash:  {:.2}", bt_config.initial_cash);
    eprintln!("  sizer_percent: {}", bt_config.sizer_percent);
    eprintln!("  commission:    {}", bt_config.commission);

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let params = match build_strategy_params(&adapter, None) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = validate_strategy_params(&params) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("  Strategy: {}", params);
    eprintln!("\nValidation passed");
    ExitCode::SUCCESS
}

fn run_strategies() -> ExitCode {
    for kind in StrategyKind::ALL {
        println!("{:<14}{}", kind.as_str(), kind.description());
        println!("{:<14}defaults: {}", "", StrategyParams::defaults(kind));
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn backtest_config_defaults() {
        let bt = build_backtest_config(&config("[backtest]\ndata_path = a.csv\n")).unwrap();
        assert_eq!(bt.data_path, PathBuf::from("a.csv"));
        assert!(!bt.reverse);
        assert!(bt.adjclose);
        assert_eq!(bt.start_date, None);
        assert!((bt.initial_cash - 10_000.0).abs() < f64::EPSILON);
        assert!((bt.sizer_percent - 90.0).abs() < f64::EPSILON);
        assert!(bt.commission.abs() < f64::EPSILON);
    }

    #[test]
    fn adjclose_can_be_turned_off() {
        let bt = build_backtest_config(&config("[backtest]\nadjclose = false\n")).unwrap();
        assert!(!bt.adjclose);
    }

    #[test]
    fn printlog_defaults_off() {
        assert!(!printlog(&config("[strategy]\nkind = sma\n")));
        assert!(printlog(&config("[strategy]\nkind = sma\nprintlog = true\n")));
    }

    #[test]
    fn turtle_params_from_config() {
        let c = config("[strategy]\nkind = turtle\nn_high = 5\nn_low = 5\n");
        let params = build_strategy_params(&c, None).unwrap();
        assert_eq!(params, StrategyParams::Turtle { n_high: 5, n_low: 5 });
    }

    #[test]
    fn kind_override_wins() {
        let c = config("[strategy]\nkind = turtle\nperiod = 7\n");
        let params = build_strategy_params(&c, Some("sma")).unwrap();
        assert_eq!(params, StrategyParams::Sma { period: 7 });
    }

    #[test]
    fn missing_kind_is_config_missing() {
        let result = build_strategy_params(&config("[strategy]\nperiod = 7\n"), None);
        assert!(matches!(result, Err(SigtraderError::ConfigMissing { .. })));
    }

    #[test]
    fn unknown_kind_rejected() {
        let result = build_strategy_params(&config("[strategy]\nkind = martingale\n"), None);
        let Err(SigtraderError::UnknownStrategy { kind }) = result else {
            panic!("Expected UnknownStrategy");
        };
        assert_eq!(kind, "martingale");
    }

    #[test]
    fn negative_period_rejected() {
        let result = build_strategy_params(&config("[strategy]\nkind = sma\nperiod = -3\n"), None);
        assert!(matches!(result, Err(SigtraderError::ConfigInvalid { .. })));
    }

    #[test]
    fn rsi_with_wilder_smoothing() {
        let c = config("[strategy]\nkind = rsi\nsmoothing = wilder\nkbuy = 70\nksell = 30\n");
        let StrategyParams::Rsi(r) = build_strategy_params(&c, None).unwrap() else {
            panic!("Expected Rsi params");
        };
        assert_eq!(r.smoothing, Smoothing::Wilder);
        assert!((r.kbuy - 70.0).abs() < f64::EPSILON);
        assert!((r.ksell - 30.0).abs() < f64::EPSILON);
        assert_eq!(r.period, 14);
    }

    #[test]
    fn bad_smoothing_rejected() {
        let c = config("[strategy]\nkind = rsi\nsmoothing = hull\n");
        assert!(build_strategy_params(&c, None).is_err());
    }

    #[test]
    fn kdj_keys_map_onto_stochastic_params() {
        let c = config("[strategy]\nkind = kdj-v2\nk_period = 9\nperiod_dfast = 3\nk_smoothing = 3\nsafediv = false\n");
        let StrategyParams::KdjV2(s) = build_strategy_params(&c, None).unwrap() else {
            panic!("Expected KdjV2 params");
        };
        assert_eq!(s.period, 9);
        assert_eq!(s.d_period, 3);
        assert_eq!(s.k_smoothing, 3);
        assert!(!s.safediv);
    }

    #[test]
    fn macd_keys() {
        let c = config("[strategy]\nkind = macd_v1\nfast_period = 5\nslow_period = 10\nsignal_period = 4\n");
        assert_eq!(
            build_strategy_params(&c, None).unwrap(),
            StrategyParams::MacdV1(MacdParams {
                fast: 5,
                slow: 10,
                signal: 4
            })
        );
    }
}
