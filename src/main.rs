use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use markup::{Escape, RenderConfig};
use pages::{DirResolver, MarkupRender, PageError, Pages};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Parse a page from a directory of markup files and write it to stdout.
#[derive(Debug, Parser)]
#[command(name = "zerotemplate", version, about)]
struct Args {
    /// Directory holding `<page>.html` files.
    root: PathBuf,
    /// Page name relative to the root, without extension.
    page: String,
    /// Escape `&`, `<`, `>` and `"` in text and attribute values.
    #[arg(long)]
    escape: bool,
    /// Print the parsed tree instead of the markup.
    #[arg(long)]
    outline: bool,
}

fn run(args: Args) -> Result<(), PageError> {
    let config = RenderConfig {
        escape: if args.escape {
            Escape::Minimal
        } else {
            Escape::None
        },
    };
    let pages =
        Pages::new(Arc::new(DirResolver::new(args.root))).with_hook(MarkupRender::new(config));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.outline {
        let Some(doc) = pages.cache().get(&args.page)? else {
            return Err(PageError::NotFound { page: args.page });
        };
        out.write_all(doc.outline().as_bytes())
            .map_err(PageError::Render)?;
    } else {
        pages.render_page(&args.page, &mut out, &())?;
    }
    out.flush().map_err(PageError::Render)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::debug!("serving `{}` from {}", args.page, args.root.display());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("zerotemplate: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
