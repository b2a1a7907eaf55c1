//! Door Lock Hierarchy
//!
//! This example demonstrates a nested state hierarchy.
//!
//! Key concepts:
//! - Substates inherit triggers from their superstate
//! - Exit actions unwind only as far as the common ancestor
//! - Entry actions run outermost first
//! - Guards pick between behaviours at fire time
//!
//! Run with: cargo run --example door_lock

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use strata::core::{Guard, State, Transition, Trigger, TriggerBehaviour};
use strata::hierarchy::{HsmError, StateGraph};
use strata::{state_enum, trigger_enum};

state_enum! {
    enum Door {
        Open,
        Closed,
        Unlocked,
        Locked,
    }
}

trigger_enum! {
    enum Command {
        Open,
        Close,
        Lock,
        Unlock,
    }
}

fn fire(
    graph: &StateGraph<Door, Command>,
    current: Door,
    trigger: Command,
) -> Result<Door, HsmError> {
    let Some(source) = graph.get(&current) else {
        return Ok(current);
    };
    let Some(handler) = source.try_find_handler(&trigger)? else {
        println!("  {} ignored in {}", trigger.name(), current.name());
        return Ok(current);
    };
    let Some(destination) = handler.results_in_transition_from(&current, &[]) else {
        return Ok(current);
    };

    let transition = Transition::new(current.clone(), destination.clone(), trigger);
    source.exit(&transition)?;
    if let Some(target) = graph.get(&destination) {
        target.enter(&transition, &[])?;
    }
    Ok(destination)
}

fn main() -> Result<(), HsmError> {
    println!("=== Door Lock Hierarchy ===\n");

    let has_key = Arc::new(AtomicBool::new(false));

    let mut graph = StateGraph::new();
    let open = graph.add_state(Door::Open)?;
    let closed = graph.add_state(Door::Closed)?;
    let unlocked = graph.add_state(Door::Unlocked)?;
    let locked = graph.add_state(Door::Locked)?;
    graph.set_superstate(unlocked, closed)?;
    graph.set_superstate(locked, closed)?;

    for id in [open, closed, unlocked, locked] {
        let name = graph.state(id).underlying_state().name().to_string();
        let entry_name = name.clone();
        let rep = graph.representation_mut(id);
        rep.add_entry_action(move |_, _| {
            println!("  -> enter {entry_name}");
            Ok(())
        });
        rep.add_exit_action(move |_| {
            println!("  <- exit {name}");
            Ok(())
        });
    }

    graph
        .representation_mut(open)
        .add_trigger_behaviour(TriggerBehaviour::permit(Command::Close, Door::Unlocked));
    graph
        .representation_mut(closed)
        .add_trigger_behaviour(TriggerBehaviour::ignore(Command::Close));
    graph
        .representation_mut(unlocked)
        .add_trigger_behaviour(TriggerBehaviour::permit(Command::Open, Door::Open));
    graph
        .representation_mut(unlocked)
        .add_trigger_behaviour(TriggerBehaviour::permit(Command::Lock, Door::Locked));
    let key = Arc::clone(&has_key);
    graph.representation_mut(locked).add_trigger_behaviour(TriggerBehaviour::permit_if(
        Command::Unlock,
        Door::Unlocked,
        Guard::new(move || key.load(Ordering::SeqCst)),
    ));

    let mut current = Door::Open;
    for command in [
        Command::Close,
        Command::Close,
        Command::Lock,
        Command::Unlock,
        Command::Open,
    ] {
        println!("{} in {}:", command.name(), current.name());
        current = fire(&graph, current, command)?;
    }

    println!("\nFetching the key...");
    has_key.store(true, Ordering::SeqCst);
    println!("Unlock in {}:", current.name());
    current = fire(&graph, current, Command::Unlock)?;

    let mut permitted: Vec<_> = graph
        .get(&current)
        .map(|state| state.permitted_triggers().into_iter().collect())
        .unwrap_or_default();
    permitted.sort_by_key(|command: &Command| command.name().to_string());
    println!("\nFinal state: {}", current.name());
    println!("Permitted: {permitted:?}");

    println!("\n=== Example Complete ===");
    Ok(())
}
