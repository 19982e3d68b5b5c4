use clap::Parser;
use pa_align::{align_pairwise, AlignmentResult};
use pa_bin::Cli;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    process::ExitCode,
    time::Instant,
};

fn write_result(out: &mut impl Write, r: &AlignmentResult, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, r)?;
        writeln!(out)
    } else {
        writeln!(out, "{r}")
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pairs = cli.input_pairs()?;
    let config = cli.align.to_config();
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let start = Instant::now();
    let mut cnt = 0;
    let mut total = 0i64;
    for r in align_pairwise(&pairs, config)? {
        let r = r?;
        cnt += 1;
        total += r.score().unwrap_or_default() as i64;
        if !cli.silent {
            write_result(&mut out, &r, cli.json)?;
        }
    }
    out.flush()?;
    log::info!(
        "Aligned {cnt} pairs in {:.3?}, total score {total}",
        start.elapsed()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
