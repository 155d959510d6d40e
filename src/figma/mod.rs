//! Figma integration: the design side of a typography comparison.
//!
//! This module provides:
//! - [`FigmaClient`] - HTTP client for the Figma REST API
//! - [`extract_design_style`] - Fetch a node and map it to a canonical style
//! - [`design_style_from_node`] - The pure node-to-style mapping
//! - API types for parsing Figma JSON responses

pub mod api_types;
pub mod client;
pub mod extract;


pub use api_types::{
    FigmaColor, FigmaEffect, FigmaNodeData, FigmaNodesResponse, FigmaPaint, FigmaTypeStyle,
    FigmaVector,
};
pub use client::{normalize_node_id, FigmaAuth, FigmaClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use extract::{design_style_from_node, extract_design_style};
