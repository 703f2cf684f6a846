//! ql-core - Core library for Quill
//!
//! This crate holds the compiled-in business rule catalog and the first
//! three stages of the question-to-SQL pipeline: intent classification,
//! table resolution, and schema pruning. Every stage is a pure function of
//! its input plus a shared, read-only [`RuleCatalog`].

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod intent;
pub mod pruner;
pub mod resolver;
pub mod table;

pub use catalog::{
    CurrencyRule, JoinConstraint, JoinKey, JoinRule, NegationRule, RuleCatalog, ScenarioFilter,
    TableDef, TemplateKey, TemplateSlot,
};
pub use classifier::classify_intent;
pub use config::{Config, Dialect};
pub use error::{CoreError, CoreResult};
pub use intent::{AggregationLevel, CurrencyCode, Intent, MetricType, Scenario, TimeWindow, Year};
pub use pruner::{prune_schema, PrunedSchema};
pub use resolver::resolve_tables;
pub use table::{Table, TableRole, TableSet};
