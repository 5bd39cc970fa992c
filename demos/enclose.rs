use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use log::info;
use rug::Rational;

use dbl_ival::{Interval, RoundingGuard};

/// Encloses an exact rational in a double interval and derives a few
/// quantities from it.
#[derive(Parser, Debug)]
#[command(author, version)]
struct Cli {
    /// Rational number, e.g. `1/3` or `-22/7`.
    value: String,

    /// Radius of an extra interval centered on the value's midpoint.
    #[arg(long, default_value_t = 0.0)]
    radius: f64,

    /// Digits after the decimal point when printing.
    #[arg(long)]
    precision: Option<usize>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    info!("args = {:?}", args);

    let q: Rational = args
        .value
        .parse()
        .map_err(|e| eyre!("cannot parse {:?}: {}", args.value, e))?;

    let _guard = RoundingGuard::downward()?;

    let x = Interval::from(&q);
    let show = |name: &str, i: Interval| match args.precision {
        Some(p) => println!("{:>8} = {:.*}", name, p, i),
        None => println!("{:>8} = {}", name, i),
    };

    show("x", x);
    show("-x", -x);
    show("x^2", x.square());
    show("1/x", Interval::from(1) / x);
    show("tanh(x)", x.tanh());
    println!("{:>8} = {:?}", "sgn", x.sgn());
    println!("{:>8} = {}", "wid", x.wid());

    if args.radius > 0.0 {
        let ball = Interval::from_center_radius(x.mid(), args.radius)?;
        show("ball", ball);
        println!("{:>8} = {:?}", "x vs ball", x.relation(&ball));
    }

    Ok(())
}
