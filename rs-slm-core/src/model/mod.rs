//! Top-level module for the n-gram counting engine.
//!
//! This module provides the pieces of a count-based n-gram model:
//! - Whitespace tokenization over a borrowed buffer (`Tokenizer`)
//! - An open-addressing hash table shared by both interners (`HashTable`)
//! - Token and context interning into dense ids
//! - A bump-allocated count table and its probability views
//! - The two-pass build pipeline (`NGramModel`)

/// Two-pass build pipeline and read-only access to the result.
pub mod ngram_model;

/// Build parameters (context length, table sizes, memory cap).
pub mod config;

/// Whitespace tokenizer yielding borrowed token views.
pub mod tokenizer;

/// Open-addressing hash table with linear probing and FNV-1a hashing.
pub mod hash_table;

/// Token bytes to dense token id.
pub mod token_interner;

/// Ring buffer of the most recent token ids.
pub mod context;

/// Tuple of token ids to dense context id.
pub mod context_interner;

/// Bump allocator backing the count table.
pub mod arena;

/// Dense context x token count matrix.
pub mod count_table;

/// Read-only view of one count-table row.
pub mod row;
