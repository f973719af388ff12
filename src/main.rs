use std::rc::Rc;
use std::sync::{Arc, Mutex};

use clap::Parser;
use scenario_scope::{BindingType, BoxError, ContextType, Registry, ScenarioContext, ScopedActivator};
use serde::Serialize;
use tracing::Level;

/// Run one scenario against the demo bindings and report what got built.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scenario title
    title: String,
    /// Tag in scope for the scenario (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Binding to activate, by type name (repeatable, activated in order)
    #[arg(long = "binding")]
    bindings: Vec<String>,
    /// Log activations to stderr
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    scenario: &'a scenario_scope::ScenarioInfo,
    constructed: Vec<&'static str>,
    active: usize,
}

type Journal = Arc<Mutex<Vec<&'static str>>>;

fn record(journal: &Journal, name: &'static str) -> Result<(), BoxError> {
    journal
        .lock()
        .map_err(|_| "construction journal poisoned")?
        .push(name);
    Ok(())
}

fn snapshot(journal: &Journal) -> Result<Vec<&'static str>, BoxError> {
    let entries = journal.lock().map_err(|_| "construction journal poisoned")?;
    Ok(entries.clone())
}

struct Session;
struct Catalog;
struct Payment;
#[allow(dead_code)]
struct LoginSteps(Rc<Session>);
#[allow(dead_code)]
struct CartSteps(Rc<Session>, Rc<Catalog>);
#[allow(dead_code)]
struct CheckoutSteps(Rc<Session>, Rc<Catalog>, Rc<Payment>);

fn demo_registry(journal: &Journal) -> Registry {
    let hook_for = |name: &'static str, journal: &Journal| {
        let journal = Arc::clone(journal);
        move || record(&journal, name)
    };
    let session = {
        let hook = hook_for("Session", journal);
        ContextType::with_factory(move || -> Result<Session, BoxError> {
            hook()?;
            Ok(Session)
        })
    };
    let catalog = {
        let hook = hook_for("Catalog", journal);
        ContextType::with_factory(move || -> Result<Catalog, BoxError> {
            hook()?;
            Ok(Catalog)
        })
    };
    let payment = {
        let hook = hook_for("Payment", journal);
        ContextType::with_factory(move || -> Result<Payment, BoxError> {
            hook()?;
            Ok(Payment)
        })
    };

    let mut registry = Registry::new();
    let hook = hook_for("LoginSteps", journal);
    registry.register(
        BindingType::new(move |s: Rc<Session>| -> Result<LoginSteps, BoxError> {
            hook()?;
            Ok(LoginSteps(s))
        }),
        vec![session.clone()],
    );
    let hook = hook_for("CartSteps", journal);
    registry.register(
        BindingType::new(move |s: Rc<Session>, c: Rc<Catalog>| -> Result<CartSteps, BoxError> {
            hook()?;
            Ok(CartSteps(s, c))
        }),
        vec![session.clone(), catalog.clone()],
    );
    let hook = hook_for("CheckoutSteps", journal);
    registry.register(
        BindingType::new(move |s: Rc<Session>, c: Rc<Catalog>, p: Rc<Payment>| -> Result<CheckoutSteps, BoxError> {
            hook()?;
            Ok(CheckoutSteps(s, c, p))
        }),
        vec![session, catalog, payment],
    );
    registry
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let journal: Journal = Arc::default();
    let registry = demo_registry(&journal);
    let mut scope = ScopedActivator::new(args.title, args.tags);

    for name in &args.bindings {
        let reg = match registry.find(name) {
            Ok(reg) => reg,
            Err(e) => {
                eprintln!("{e}; available: {}", registry.names().join(", "));
                std::process::exit(1);
            }
        };
        if let Err(e) = scope.get_or_activate_binding(&reg.binding, &reg.contexts) {
            eprintln!("Activation of `{name}` failed: {e}");
            std::process::exit(1);
        }
    }

    let constructed = match snapshot(&journal) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Failed to build report: {e}");
            std::process::exit(1);
        }
    };
    let report = Report {
        scenario: scope.scenario_info(),
        constructed,
        active: scope.active_count(),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("Failed to render report: {e}");
            std::process::exit(1);
        }
    }
    scope.dispose();
}
