use chordboard::{render_song, transpose, view_song, Dialect, SheetError, SongDocument, SongView, ViewOptions};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: chordboard [--key K] [--set-key K] [--transpose N] [--inline] [--json | --sections] <song.txt>";

#[derive(Debug, Default)]
struct Args {
    input: PathBuf,
    key: Option<String>,
    set_key: Option<String>,
    transpose: Option<i32>,
    inline: bool,
    json: bool,
    sections: bool,
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("{}", USAGE);
    process::exit(1);
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Args {
    let mut args = Args::default();
    let mut input = None;

    while let Some(arg) = raw.next() {
        let mut value = |flag: &str| raw.next().unwrap_or_else(|| usage_error(&format!("{} needs a value", flag)));
        match arg.as_str() {
            "--key" => args.key = Some(value("--key")),
            "--set-key" => args.set_key = Some(value("--set-key")),
            "--transpose" => {
                let amount = value("--transpose");
                match amount.parse::<i32>() {
                    Ok(n) => args.transpose = Some(n),
                    Err(_) => usage_error(&format!("--transpose expects a number, got '{}'", amount)),
                }
            }
            "--inline" => args.inline = true,
            "--json" => args.json = true,
            "--sections" => args.sections = true,
            flag if flag.starts_with("--") => usage_error(&format!("Unknown option '{}'", flag)),
            path => input = Some(PathBuf::from(path)),
        }
    }

    match input {
        Some(path) => args.input = path,
        None => usage_error("No input file"),
    }
    args
}

fn read_document(args: &Args) -> Result<SongDocument, SheetError> {
    let source = fs::read_to_string(&args.input).map_err(|source| SheetError::Io {
        path: args.input.clone(),
        source,
    })?;
    let mut doc = SongDocument::parse(&source)?;
    if args.inline {
        doc.dialect = Dialect::Inline;
    }
    Ok(doc)
}

enum Plan {
    /// Move by a fixed amount; the song has no usable key to spell toward
    Shift(i32),
    View(ViewOptions),
}

fn plan(args: &Args, doc: &SongDocument) -> Plan {
    let user_key = match (args.transpose, doc.parsed_key()) {
        (Some(amount), None) => return Plan::Shift(amount),
        (Some(amount), Some(song_key)) => Some(song_key.transposed(amount).name()),
        (None, _) => args.key.clone(),
    };
    Plan::View(ViewOptions {
        user_key,
        set_key: args.set_key.clone(),
    })
}

fn key_line(view: &SongView) -> Option<String> {
    let key = view.display_key.as_ref()?;
    Some(format!("Key: {}  Capo: {}", key, view.capo.semitones))
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chordboard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(env::args().skip(1));

    let doc = match read_document(&args) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let options = match plan(&args, &doc) {
        Plan::Shift(amount) => {
            let song = transpose(&doc.song(), amount, None);
            println!("{}", render_song(&song, doc.dialect));
            return;
        }
        Plan::View(options) => options,
    };
    let view = view_song(&doc, &options);
    tracing::info!(
        file = %args.input.display(),
        lines = view.song.len(),
        sections = view.sections.len(),
        "Rendered song"
    );

    if args.json {
        match serde_json::to_string_pretty(&view) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing song: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if args.sections {
        for meta in &view.sections {
            println!("{}\t{}\t{}\t{}", meta.index, meta.abbreviation, meta.title, meta.color);
        }
        return;
    }

    if let Some(title) = &view.title {
        println!("{}", title);
    }
    if let Some(author) = &view.author {
        println!("{}", author);
    }
    if let Some(line) = key_line(&view) {
        println!("{}", line);
    }
    println!();
    println!("{}", render_song(&view.song, doc.dialect));
}
