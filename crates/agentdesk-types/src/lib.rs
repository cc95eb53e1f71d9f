//! AgentDesk Types - Core types for the AgentDesk gateway
//!
//! This module defines the data model shared by the record store, the agent
//! dispatcher and the HTTP gateway. Everything here serialises with camelCase
//! field names, which is the shape the browser workspace expects.

pub mod agent;
pub mod project;
pub mod provider;
pub mod skill;

pub use agent::{AgentContext, AgentMode, AgentRequest, AgentResponse};
pub use project::{NewProject, Project};
pub use provider::Provider;
pub use skill::{placeholder_content, NewSkill, Skill, SkillCategory};
