//! trex - materialize a schema document and explain what follows from it.

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use trex::{
    parse_statement, Axiom, Disjunction, Document, Ontology, Reasoner, ReasonerConfig, Result,
    Statement, TrexError,
};

#[derive(Parser)]
#[command(name = "trex")]
#[command(version)]
#[command(about = "Explained materialization of subsumption, disjointness, domain and range")]
struct Cli {
    /// Axiom document to load
    file: Option<PathBuf>,

    /// Enter the interactive prompt after processing FILE
    #[arg(long)]
    repl: bool,

    /// Skip explanation tracking
    #[arg(long)]
    no_explanations: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = if cli.no_explanations {
        ReasonerConfig::without_explanations()
    } else {
        ReasonerConfig::default()
    };

    let Some(path) = cli.file else {
        let ontology = Ontology::new();
        let reasoner = Reasoner::new(&ontology, config)?;
        return run_repl(Session { ontology, reasoner });
    };

    let doc = match Document::load(&path) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error loading {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };
    info!(file = %path.display(), axioms = doc.ontology.len(), queries = doc.queries.len(), "loaded");

    let reasoner = Reasoner::new(&doc.ontology, config)?;
    print_incoherence(&reasoner);
    for query in &doc.queries {
        answer(&reasoner, query);
    }

    if cli.repl {
        return run_repl(Session {
            ontology: doc.ontology,
            reasoner,
        });
    }
    Ok(())
}

/// REPL state: the asserted facts and the reasoner built over them.
struct Session {
    ontology: Ontology,
    reasoner: Reasoner,
}

impl Session {
    /// Assert a fact, rebuilding the reasoner if it names a new entity.
    fn assert(&mut self, axiom: Axiom) -> Result<()> {
        match self.reasoner.add_fact(&axiom) {
            Ok(changed) => {
                self.ontology.add_axiom(axiom);
                if changed {
                    self.reasoner.rematerialize();
                    println!("Added.");
                } else {
                    println!("Already known.");
                }
                Ok(())
            }
            Err(TrexError::UnknownEntity(name)) => {
                info!(entity = %name, "new entity, rebuilding reasoner");
                self.ontology.add_axiom(axiom);
                self.reasoner = Reasoner::new(&self.ontology, self.reasoner.config())?;
                println!("Added (reasoner rebuilt).");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

fn run_repl(mut session: Session) -> Result<()> {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Error: cannot start line editor: {}", e);
            return Ok(());
        }
    };
    println!("trex REPL. Type :help for commands.");

    loop {
        let readline = rl.readline("trex> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);

                if trimmed.starts_with(':') {
                    if !handle_command(trimmed, &mut session) {
                        break;
                    }
                } else {
                    handle_statement(trimmed, &mut session);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Bye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

/// Handle REPL commands (starting with :)
/// Returns false if REPL should exit
fn handle_command(cmd: &str, session: &mut Session) -> bool {
    let (command, rest) = match cmd.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (cmd, ""),
    };

    match command {
        ":quit" | ":q" | ":exit" => {
            println!("Bye!");
            return false;
        }

        ":help" | ":h" | ":?" => {
            print_help();
        }

        ":unsat" | ":u" => {
            print_incoherence(&session.reasoner);
        }

        ":cycles" | ":c" => {
            print_cycles(&session.reasoner);
        }

        ":axioms" | ":a" => {
            print!("{}", session.reasoner.report());
        }

        ":explain" | ":e" => {
            if rest.is_empty() {
                println!("Usage: :explain <fact>");
            } else {
                let text = if rest.ends_with('?') || rest.ends_with('.') {
                    rest.to_string()
                } else {
                    format!("{}?", rest)
                };
                match parse_statement(&text) {
                    Ok(Statement::Query(axiom) | Statement::Assert(axiom)) => {
                        answer(&session.reasoner, &axiom)
                    }
                    Ok(other) => println!("Not a fact: {}", other),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
        }

        ":remat" | ":r" => {
            for (relation, stats) in session.reasoner.rematerialize() {
                println!(
                    "  {:<26} {} pass(es), {} change(s)",
                    relation.to_string(),
                    stats.passes,
                    stats.changes
                );
            }
        }

        _ => {
            println!("Unknown command: {}. Type :help for help.", command);
        }
    }

    true
}

/// Handle `Fact.` (assert) and `Fact?` (query) input.
fn handle_statement(input: &str, session: &mut Session) {
    match parse_statement(input) {
        Ok(Statement::Assert(axiom)) => {
            if let Err(e) = session.assert(axiom) {
                eprintln!("Error: {}", e);
            }
        }
        Ok(Statement::Query(axiom)) => answer(&session.reasoner, &axiom),
        Ok(Statement::Declare(..)) => {
            println!("Declarations are only read from documents.");
        }
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn answer(reasoner: &Reasoner, query: &Axiom) {
    match reasoner.is_entailed(query) {
        Ok(true) => {
            println!("{}? yes", query);
            if reasoner.config().explanations {
                match reasoner.explanation(query) {
                    Ok(Some(why)) => print_explanation(&why),
                    Ok(None) => {}
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
        }
        Ok(false) => println!("{}? no", query),
        Err(e) => eprintln!("{}? error: {}", query, e),
    }
}

fn print_explanation(why: &Disjunction) {
    for conj in why.iter() {
        println!("    because {}", conj);
    }
}

fn print_incoherence(reasoner: &Reasoner) {
    let concepts = reasoner.unsatisfiable_concepts();
    let properties = reasoner.unsatisfiable_properties();
    if concepts.is_empty() && properties.is_empty() {
        println!("No unsatisfiable concepts or properties.");
    }
    for name in concepts {
        println!("Unsatisfiable concept: {}", name);
        if let Ok(Some(why)) = reasoner.unsatisfiability_explanation_concept(name) {
            print_explanation(&why);
        }
    }
    for name in properties {
        println!("Unsatisfiable property: {}", name);
        if let Ok(Some(why)) = reasoner.unsatisfiability_explanation_property(name) {
            print_explanation(&why);
        }
    }
    print_cycles(reasoner);
}

fn print_cycles(reasoner: &Reasoner) {
    for name in reasoner.concept_cycles() {
        println!("Concept on a subsumption cycle: {}", name);
        if let Ok(Some(why)) = reasoner.explanation(&Axiom::sub_class_of(name, name)) {
            print_explanation(&why);
        }
    }
    for name in reasoner.property_cycles() {
        println!("Property on a subsumption cycle: {}", name);
        if let Ok(Some(why)) = reasoner.explanation(&Axiom::sub_property_of(name, name)) {
            print_explanation(&why);
        }
    }
}

fn print_help() {
    println!(
        r#"trex Commands:
  :help, :h, :?       Show this help
  :quit, :q           Exit the REPL
  :unsat, :u          List unsatisfiable concepts and properties
  :cycles, :c         List entities on subsumption cycles
  :axioms, :a         List every entailed fact with its explanation
  :explain, :e <fact> Explain a fact, e.g. :explain SubClassOf(A, C)
  :remat, :r          Re-run materialization and show pass statistics

Statements:
  SubClassOf(A, B).                 Assert a fact
  SubClassOf(A, C)?                 Ask whether a fact is entailed
  EquivalentClasses(A, B, C).       N-ary facts are read pairwise
  DisjointClasses(A, B).
  SubObjectPropertyOf(p, q).
  EquivalentObjectProperties(p, q).
  DisjointObjectProperties(p, q).
  ObjectPropertyDomain(p, A).
  ObjectPropertyRange(p, A).
"#
    );
}
