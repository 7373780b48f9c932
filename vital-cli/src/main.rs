use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{SecondsFormat, Utc};
use clap::Parser;
use flate2::Compression;
use flate2::write::GzEncoder;
use vital::error::VitalError;
use vital::reader::{VitalFile, open_vital, parse_vital};
use vital::view::{RealValues, TrackView};

#[derive(Parser)]
#[command(name = "vital", about = "Inspect and export Vital Recorder .vital captures")]
struct Args {
    /// Input .vital file
    #[arg(required_unless_present_any = ["schema", "version"])]
    input: Option<String>,

    /// Print a human-readable file/track summary; do not export
    #[arg(short = 'I', long = "info")]
    info: bool,

    /// Output directory for CSV exports
    #[arg(short = 'o', long = "outdir")]
    outdir: Option<String>,

    /// Export tracks by numeric id
    #[arg(short = 't', long = "trkid")]
    trkid: Vec<u16>,

    /// Export tracks by name
    #[arg(short = 'n', long = "name")]
    name: Vec<String>,

    /// Export every track
    #[arg(long)]
    saveall: bool,

    /// Gzip the emitted CSV files
    #[arg(long)]
    gzip: bool,

    /// Print the decoded file as JSON instead of exporting
    #[arg(long)]
    json: bool,

    /// Print the JSON Schema for the decoded-file output and exit
    #[arg(long)]
    schema: bool,

    /// Print a version banner and exit
    #[arg(long)]
    version: bool,
}

fn main() -> ExitCode {
    // Reset SIGPIPE to default so piped output (e.g. head/tail) exits cleanly.
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    env_logger::init();

    let args = Args::parse();

    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    if args.schema {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                log::error!("{err}");
                ExitCode::FAILURE
            }
        };
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let input = args
        .input
        .as_deref()
        .ok_or_else(|| VitalError::InvalidSelection("no input file given".into()))?;
    let path = Path::new(input);

    log::info!("opening {input}");
    let reader = open_vital(path)?;
    let file = parse_vital(&reader)?;

    if args.json {
        println!("{}", serde_json::to_string(&file)?);
        return Ok(());
    }

    if args.info {
        print_info(&file);
        return Ok(());
    }

    let selection = Selection::from_args(args)?;
    let outdir = resolve_outdir(args, path);
    fs::create_dir_all(&outdir)?;

    let trkids = selection.resolve(&file)?;
    for trkid in trkids {
        let view = file.get_track(Some(trkid), None)?;
        let dest = outdir.join(output_filename(
            input,
            &view.info.name,
            view.info.devid,
            args.gzip,
        ));
        log::info!("writing {}", dest.display());
        write_csv(&view, &dest, args.gzip)?;
    }

    Ok(())
}

/// Which tracks the CLI was asked to export (exactly one of
/// `--saveall`/`--trkid`/`--name` is required outside `--info`/`--json`).
enum Selection {
    All,
    ByTrkid(Vec<u16>),
    ByName(Vec<String>),
}

impl Selection {
    fn from_args(args: &Args) -> Result<Self, VitalError> {
        let given = [args.saveall, !args.trkid.is_empty(), !args.name.is_empty()]
            .iter()
            .filter(|b| **b)
            .count();
        if given != 1 {
            return Err(VitalError::InvalidSelection(
                "exactly one of --saveall, --trkid, --name is required".into(),
            ));
        }
        Ok(if args.saveall {
            Selection::All
        } else if !args.trkid.is_empty() {
            Selection::ByTrkid(args.trkid.clone())
        } else {
            Selection::ByName(args.name.clone())
        })
    }

    fn resolve(&self, file: &VitalFile) -> Result<Vec<u16>, VitalError> {
        match self {
            Selection::All => Ok(file.track_info.iter().map(|t| t.trkid).collect()),
            Selection::ByTrkid(ids) => Ok(ids.clone()),
            Selection::ByName(names) => names
                .iter()
                .map(|n| file.get_track(None, Some(n)).map(|v| v.info.trkid))
                .collect(),
        }
    }
}

fn resolve_outdir(args: &Args, input: &Path) -> PathBuf {
    match &args.outdir {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(format!(
            "{}_converted",
            input.file_stem().and_then(|s| s.to_str()).unwrap_or("output")
        )),
    }
}

fn output_filename(input: &str, track_name: &str, devid: u32, gzip: bool) -> String {
    let stem = Path::new(input)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let suffix = if gzip { ".csv.gz" } else { ".csv" };
    format!("{stem}_signal_{track_name}_{devid}{suffix}")
}

/// Two-column (timestamp, value) CSV, no header row, no quoting.
fn write_csv(view: &TrackView<'_>, dest: &Path, gzip: bool) -> std::io::Result<()> {
    let file = fs::File::create(dest)?;
    if gzip {
        let mut writer = GzEncoder::new(file, Compression::default());
        write_csv_rows(view, &mut writer)?;
        writer.finish()?;
    } else {
        let mut writer = std::io::BufWriter::new(file);
        write_csv_rows(view, &mut writer)?;
        writer.flush()?;
    }
    Ok(())
}

fn write_csv_rows(view: &TrackView<'_>, writer: &mut impl Write) -> std::io::Result<()> {
    for block in &view.blocks {
        let ts = block.dt.to_rfc3339_opts(SecondsFormat::Millis, true);
        match &block.values {
            RealValues::Num(v) => writeln!(writer, "{ts},{v}")?,
            RealValues::Str(s) => writeln!(writer, "{ts},{s}")?,
            RealValues::Wav(vals) => {
                for v in vals {
                    writeln!(writer, "{ts},{v}")?;
                }
            }
        }
    }
    Ok(())
}

fn print_info(file: &VitalFile) {
    println!(
        "format_ver={} tzbias={} inst_id={} prog_ver={}",
        file.header.format_ver, file.header.tzbias, file.header.inst_id, file.header.prog_ver
    );
    println!(
        "{:>6} {:>20} {:>8} {:>6} {:>10} {:>10} {:>8}",
        "trkid", "name", "unit", "srate", "adc_gain", "adc_offset", "n_recs"
    );
    for info in &file.track_info {
        let n_recs = file.recs.iter().filter(|r| r.trkid == info.trkid).count();
        println!(
            "{:>6} {:>20} {:>8} {:>6} {:>10} {:>10} {:>8}",
            info.trkid, info.name, info.unit, info.srate, info.adc_gain, info.adc_offset, n_recs
        );
    }
}

fn print_schema() -> Result<(), Box<dyn std::error::Error>> {
    let schema = schemars::schema_for!(vital::reader::VitalFile);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn print_version() {
    println!("vital");
    println!("A decoder for Vital Recorder .vital capture files");
    println!();

    let release = env!("RELEASE_VERSION");
    let commit = env!("GIT_COMMIT");
    if !release.is_empty() {
        println!("\tVersion:     {release}");
    } else {
        println!("\tGit commit:  {commit}");
    }
    println!("\tBuilt:       {}", Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
}
