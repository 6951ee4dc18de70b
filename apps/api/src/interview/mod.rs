// Interview conversation engine.
// Implements: session store, instruction composer, turn orchestrator, chat endpoints.
// All Responder calls for a chat turn go through the orchestrator.

pub mod composer;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod session_store;
