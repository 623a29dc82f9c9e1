use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};

use pocsag_tx::config::{ModulationParams, TxConfig};
use pocsag_tx::fsk::FskSynthesizer;
use pocsag_tx::pocsag::Transmission;
use pocsag_tx::serial::{LineMap, MonotonicClock, SerialKeyer, SerialLines};
use pocsag_tx::tx::{Interruptible, WordStream, transmit};
use pocsag_tx::ui::{TxProgress, WithProgress, print_banner};
use pocsag_tx::utils::consts::*;
use pocsag_tx::utils::logging::init_logging;

#[derive(Parser)]
#[command(author, version, about = "POCSAG transmitter: I/Q files for SDR playback, or direct serial-port keying", long_about = None)]
struct Cli {
    /// Sample rate in samples per second
    #[arg(short = 's', long, global = true, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    /// POCSAG baud rate; common values are 512, 1200 and 2400
    #[arg(short = 'r', long, global = true, default_value_t = DEFAULT_BAUD_RATE)]
    baud_rate: u32,

    /// Frequency deviation in Hz
    #[arg(short = 'd', long, global = true, default_value_t = DEFAULT_DEVIATION)]
    deviation: u32,

    /// Peak amplitude for the I/Q components (clamped to 127)
    #[arg(short = 'a', long, global = true, default_value_t = DEFAULT_AMPLITUDE)]
    amplitude: u32,

    /// Invert every transmitted bit
    #[arg(short = 'i', long, global = true)]
    invert: bool,

    /// Increase verbosity (-v: debug, -vv: trace); RUST_LOG overrides
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Page {
    /// Pager CAP code (21 bits)
    capcode: u32,
    /// Function code, 0 to 3
    function: u8,
    /// Alphanumeric message; numeric messages aren't currently supported
    message: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an I/Q sample file suitable for hackrf_transfer and friends
    Sdr {
        /// Output file; auto-generated from the page parameters by default
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        page: Page,
    },
    /// Key a transmitter in real time over a serial port's DTR/RTS lines
    Serial {
        /// Serial device, e.g. /dev/ttyUSB0 or COM3
        #[arg(short, long)]
        port: String,

        /// PTT lead delay in milliseconds before the first bit
        #[arg(short = 't', long, default_value_t = 0)]
        ptt_delay: u64,

        /// Put data on RTS and PTT on DTR instead of the default
        #[arg(long)]
        swap_lines: bool,

        /// Treat PTT as active-low
        #[arg(long)]
        invert_ptt: bool,

        #[command(flatten)]
        page: Page,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = TxConfig {
        sample_rate: cli.sample_rate,
        deviation: cli.deviation,
        bit_rate: cli.baud_rate,
        amplitude: cli.amplitude,
        invert: cli.invert,
        ..TxConfig::default()
    };

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .context("installing Ctrl-C handler")?;
    }

    match cli.command {
        Commands::Sdr { output, page } => {
            print_banner("SDR I/Q file generation mode");
            let file_name = output.unwrap_or_else(|| default_file_name(&cfg, &page));
            run_sdr(&cfg, &page, &file_name, stop)
        }
        Commands::Serial { port, ptt_delay, swap_lines, invert_ptt, page } => {
            print_banner("COM port encoder mode");
            let cfg = TxConfig {
                ptt_lead_ms: ptt_delay,
                swap_lines,
                invert_ptt,
                ..cfg
            };
            run_serial(&cfg, &page, &port, stop)
        }
    }
}

fn default_file_name(cfg: &TxConfig, page: &Page) -> String {
    format!(
        "POCSAG_{}_{}_{}_{}_{}{}.bin",
        page.capcode,
        page.function,
        cfg.bit_rate,
        cfg.deviation,
        cfg.sample_rate,
        if cfg.invert { "_inv" } else { "" }
    )
}

fn build_transmission(page: &Page) -> anyhow::Result<Vec<u32>> {
    let mut tx = Transmission::new();
    tx.add_message(page.capcode, page.function, &page.message)
        .context("encoding page")?;
    Ok(tx.into_words())
}

fn run_sdr(
    cfg: &TxConfig,
    page: &Page,
    file_name: &str,
    stop: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let params = ModulationParams::derive(cfg).context("deriving modulation parameters")?;
    debug!("Samples per bit: {}/{}", params.cycles_per_bit, params.cycles_per_bit_exact);
    debug!("Samples per freq cycle: {}/{}", params.divider, params.divider_exact);

    let words = build_transmission(page)?;
    let total_words = words.len() as u64;

    let file = File::create(file_name)
        .with_context(|| format!("can't open output file '{file_name}'"))?;
    let mut synth = FskSynthesizer::new(params, BufWriter::new(file))
        .context("initializing FSK synthesizer")?;

    let progress = TxProgress::new(total_words, file_name);
    let mut source =
        WithProgress::new(Interruptible::new(WordStream::new(words), stop), progress);

    let bits = transmit(&mut source, &mut synth, cfg.invert).context("transmitting")?;
    source.finish();
    let samples = synth.samples_written();
    synth.finish().context("finalizing sample file")?;

    info!(
        "*** FINISH *** {bits} bits / {samples} I/Q sample pairs written to '{file_name}'"
    );
    Ok(())
}

fn run_serial(
    cfg: &TxConfig,
    page: &Page,
    port: &str,
    stop: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let words = build_transmission(page)?;

    let lines = SerialLines::open(port)
        .with_context(|| format!("opening serial device '{port}'"))?;
    let map = LineMap::resolve(cfg.swap_lines, cfg.invert_ptt);
    let mut keyer = SerialKeyer::new(
        lines,
        MonotonicClock::new(),
        map,
        cfg.bit_rate,
        Duration::from_millis(cfg.ptt_lead_ms),
    )
    .context("initializing keying scheduler")?;
    debug!("Ticks per bit: {}", keyer.ticks_per_bit());

    let mut source = Interruptible::new(WordStream::new(words), stop);

    keyer.start().context("starting keying session")?;
    let result = transmit(&mut source, &mut keyer, cfg.invert);
    // Always try to drop PTT, but report the transmit error first if both fail.
    let stats = match keyer.finish() {
        Ok(stats) => stats,
        Err(close_err) => {
            result.context("transmitting")?;
            return Err(close_err).context("closing keying session");
        }
    };
    result.context("transmitting")?;

    info!(
        "*** FINISH *** {} bits have been sent, frequency: {}, calculated # of ticks per bit: {}, average # of ticks per bit: {}",
        stats.total_bits_sent,
        stats.ticks_per_second,
        stats.ticks_per_bit,
        stats.avg_ticks_per_bit,
    );
    if stats.bits_with_delays > 0 {
        warn!(
            "{} bits have been sent with delays, maximum delay is {} ticks ({} seconds)",
            stats.bits_with_delays, stats.max_delay_ticks, stats.max_delay_secs,
        );
    }
    Ok(())
}
