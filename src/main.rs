use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use logagg::command::parser::{parse_field_list, parse_stats_funcs};
use logagg::engine::core::column::read_json_lines;
use logagg::engine::core::read::aggregate::marshal_fields_to_json;
use logagg::engine::core::read::sink::MemoryBudget;
use logagg::engine::shard::{RunOptions, run_sharded};
use logagg::logging;
use tracing::info;

#[derive(Parser)]
#[command(name = "logagg")]
#[command(about = "Group JSON log lines and select extreme rows per group", long_about = None)]
struct Args {
    /// JSON-lines input file, `-` for stdin
    #[arg(default_value = "-")]
    input: String,

    /// Stats functions, e.g. `row_min(duration, path), row_max(_time)`
    #[arg(short, long)]
    stats: String,

    /// Comma-separated fields to group by
    #[arg(short, long, default_value = "")]
    by: String,

    /// Rows per block
    #[arg(long, default_value = "1024")]
    block_rows: usize,

    /// Number of shards (0 = one per CPU); overrides the config file
    #[arg(long)]
    shards: Option<usize>,

    /// Memory limit for group state in bytes; overrides the config file
    #[arg(long)]
    max_state_bytes: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init()?;

    let funcs = parse_stats_funcs(&args.stats).context("parsing --stats")?;
    let by = if args.by.trim().is_empty() {
        Vec::new()
    } else {
        parse_field_list(&args.by).context("parsing --by")?
    };

    let blocks = if args.input == "-" {
        read_json_lines(io::stdin().lock(), args.block_rows)?
    } else {
        let file = File::open(&args.input).with_context(|| format!("opening {}", args.input))?;
        read_json_lines(BufReader::new(file), args.block_rows)?
    };
    info!(blocks = blocks.len(), input = %args.input, "Loaded input");

    let mut opts = RunOptions::from_config();
    if let Some(shards) = args.shards {
        opts = opts.with_shard_count(shards);
    }
    if let Some(limit) = args.max_state_bytes {
        opts = opts.with_budget(Arc::new(MemoryBudget::new(limit)));
    }

    let rows = match run_sharded(funcs, by, &blocks, &opts) {
        Ok(rows) => rows,
        Err(err) => {
            err.log_error();
            return Err(err.into());
        }
    };

    let mut out = BufWriter::new(io::stdout().lock());
    let mut buf = Vec::new();
    for row in &rows {
        buf.clear();
        marshal_fields_to_json(&mut buf, row)?;
        buf.push(b'\n');
        out.write_all(&buf)?;
    }
    out.flush()?;
    Ok(())
}
