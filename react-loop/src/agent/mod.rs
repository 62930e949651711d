//! Agents. Only the ReAct loop lives here.

pub mod react;
