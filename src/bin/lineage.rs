//! Lineage CLI — build a family graph and render it.
//!
//! Usage:
//!   lineage add <name> [--spouse NAME] [--parents A,B] [--label TEXT] [--db path]
//!   lineage render [--output tree.dot] [--db path]

use clap::{Parser, Subcommand};
use lineage::{DotOptions, Entry, LineageApi, OpenStore, ParentSet, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "lineage",
    version,
    about = "Genealogical graph engine with layered diagram projection"
)]
struct Cli {
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a person, optionally linking a spouse and parents in one entry
    Add {
        /// Display name
        name: String,
        /// Spouse name (created if not yet recorded)
        #[arg(long)]
        spouse: Option<String>,
        /// Parent name(s), comma-separated (one or two)
        #[arg(long, value_delimiter = ',')]
        parents: Vec<String>,
        /// Text on the arrow from parents to this person (e.g. Daughter)
        #[arg(long)]
        label: Option<String>,
        /// Free-text annotation shown under the name
        #[arg(long)]
        note: Option<String>,
    },
    /// Link two persons as spouses
    Spouse {
        a: String,
        b: String,
    },
    /// Record the parent(s) of a child
    Parents {
        /// One or two parent names
        #[arg(required = true, num_args = 1..=2)]
        parents: Vec<String>,
        /// Child name
        #[arg(long)]
        child: String,
        /// Text on the parents→child arrow
        #[arg(long)]
        label: Option<String>,
    },
    /// Rename a person
    Rename {
        /// Current name
        from: String,
        /// New name
        to: String,
    },
    /// Delete a person (cascades relationship cleanup)
    Delete {
        name: String,
    },
    /// List persons and their relationships
    List,
    /// Render the graph as Graphviz DOT
    Render {
        /// Write DOT to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Remove every person and relationship
    Clear,
}

/// Get the default database path (~/.local/share/lineage/lineage.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    let lineage_dir = data_dir.join("lineage");
    std::fs::create_dir_all(&lineage_dir).ok();
    lineage_dir.join("lineage.db")
}

fn open_api(db: Option<PathBuf>) -> Result<LineageApi, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    let store =
        SqliteStore::open(&db_path).map_err(|e| format!("Failed to open database: {}", e))?;
    let api = LineageApi::with_store(Arc::new(store));
    api.load().map_err(|e| format!("Failed to load graph: {}", e))?;
    Ok(api)
}

fn save_and_report(api: &LineageApi) -> i32 {
    match api.save() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_add(api: &LineageApi, entry: Entry) -> i32 {
    match api.add_entry(&entry) {
        Ok(id) => {
            println!("Added '{}' ({})", entry.name.trim(), id);
            save_and_report(api)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_spouse(api: &LineageApi, a: &str, b: &str) -> i32 {
    match api.link_spouses(a, b) {
        Ok(id) => {
            println!("Linked '{}' and '{}' ({})", a.trim(), b.trim(), id);
            save_and_report(api)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_parents(api: &LineageApi, parents: &[String], child: &str, label: Option<&str>) -> i32 {
    let parent_refs: Vec<&str> = parents.iter().map(String::as_str).collect();
    match api.link_parents(&parent_refs, child, label) {
        Ok(()) => {
            println!("Linked {} -> '{}'", parents.join(" + "), child.trim());
            save_and_report(api)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_rename(api: &LineageApi, from: &str, to: &str) -> i32 {
    match api.rename(from, to) {
        Ok(_) => {
            println!("Renamed '{}' to '{}'", from.trim(), to.trim());
            save_and_report(api)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_delete(api: &LineageApi, name: &str) -> i32 {
    match api.delete(name) {
        Ok(_) => {
            println!("Deleted '{}'", name.trim());
            save_and_report(api)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_list(api: &LineageApi) -> i32 {
    let graph = api.snapshot();
    if graph.person_count() == 0 {
        println!("No persons recorded.");
        return 0;
    }

    let mut persons: Vec<_> = graph.persons().collect();
    persons.sort_by_key(|p| (p.metadata.created_at, p.id));
    for person in persons {
        let spouses: Vec<String> = graph
            .spouses_of(person.id)
            .into_iter()
            .filter_map(|id| graph.person(id).map(|p| p.name.clone()))
            .collect();
        let parents: Vec<String> = graph
            .parent_link_of(person.id)
            .map(|link| match link.parents {
                ParentSet::Single { parent } => vec![parent],
                ParentSet::Couple { parents } => vec![parents.0, parents.1],
            })
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| graph.person(id).map(|p| p.name.clone()))
            .collect();

        let mut line = person.name.clone();
        if let Some(note) = &person.note {
            line.push_str(&format!(" ({})", note));
        }
        if !spouses.is_empty() {
            line.push_str(&format!("  spouse: {}", spouses.join(", ")));
        }
        if !parents.is_empty() {
            line.push_str(&format!("  parents: {}", parents.join(", ")));
        }
        println!("{}", line);
    }
    0
}

fn cmd_render(api: &LineageApi, output: Option<&PathBuf>) -> i32 {
    let dot = api.project().to_dot(&DotOptions::default());
    match output {
        Some(path) => match std::fs::write(path, &dot) {
            Ok(()) => {
                println!("Wrote {}", path.display());
                0
            }
            Err(e) => {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                1
            }
        },
        None => {
            print!("{}", dot);
            0
        }
    }
}

fn cmd_clear(api: &LineageApi) -> i32 {
    api.clear();
    println!("Cleared the graph.");
    save_and_report(api)
}

fn main() {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let api = match open_api(cli.db) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Add {
            name,
            spouse,
            parents,
            label,
            note,
        } => {
            let entry = Entry {
                name,
                spouse,
                parents,
                label,
                note,
            };
            cmd_add(&api, entry)
        }
        Commands::Spouse { a, b } => cmd_spouse(&api, &a, &b),
        Commands::Parents {
            parents,
            child,
            label,
        } => cmd_parents(&api, &parents, &child, label.as_deref()),
        Commands::Rename { from, to } => cmd_rename(&api, &from, &to),
        Commands::Delete { name } => cmd_delete(&api, &name),
        Commands::List => cmd_list(&api),
        Commands::Render { output } => cmd_render(&api, output.as_ref()),
        Commands::Clear => cmd_clear(&api),
    };
    std::process::exit(code);
}
