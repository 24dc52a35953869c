use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use rs_slm_core::model::tokenizer::Tokenizer;
use rs_slm_core::{BuildConfig, BuildError, InputStatus, NGramModel};

fn build(text: &str, n: usize) -> NGramModel<'_> {
	NGramModel::build(text.as_bytes(), &BuildConfig::new(n).unwrap()).unwrap()
}

fn words(model: &NGramModel) -> Vec<String> {
	model.tokens().map(|(view, _)| view.to_string_lossy().into_owned()).collect()
}

#[test]
fn unigram_contexts_over_short_sentence() {
	let model = build("the cat sat on the mat", 1);
	assert_eq!(model.vocab_size(), 5);
	assert_eq!(model.context_count(), 5);
	assert_eq!(words(&model), vec!["the", "cat", "sat", "on", "mat"]);

	let expected = [("the", "cat"), ("cat", "sat"), ("sat", "on"), ("on", "the"), ("the", "mat")];
	for (context, next) in expected {
		let c = model.context_id_of(&[context]).unwrap();
		let t = model.token_id(next.as_bytes()).unwrap();
		assert_eq!(model.count(c, t), 1, "{} -> {}", context, next);
	}
	assert_eq!(model.table().total(), 5);
}

#[test]
fn bigram_contexts_alternate() {
	let model = build("a b a b", 2);
	assert_eq!(model.vocab_size(), 2);
	assert_eq!(model.context_count(), 2);

	let a = model.token_id(b"a").unwrap();
	let b = model.token_id(b"b").unwrap();
	let ab = model.context_id(&[a, b]).unwrap();
	let ba = model.context_id(&[b, a]).unwrap();
	assert_ne!(ab, ba);
	assert_eq!(model.count(ab, a), 1);
	assert_eq!(model.count(ab, b), 0);
	assert_eq!(model.count(ba, b), 1);
	assert_eq!(model.count(ba, a), 0);
}

#[test]
fn empty_corpus_is_reported_not_fatal() {
	let model = build("", 2);
	assert_eq!(model.vocab_size(), 0);
	assert_eq!(model.context_count(), 0);
	assert_eq!(model.total_token_count(), 0);
	assert_eq!(model.input_status(), InputStatus::Empty);
	assert!(model.row(0).is_none());

	let blank = build(" \n\t\r\n ", 1);
	assert_eq!(blank.input_status(), InputStatus::Empty);
}

#[test]
fn invalid_context_length_is_rejected() {
	let config: BuildConfig = serde_json::from_str(r#"{ "context_len": 0 }"#).unwrap();
	assert!(matches!(
		NGramModel::build(b"a b", &config),
		Err(BuildError::InvalidConfig(_))
	));
}

#[test]
fn config_from_json_with_defaults() {
	let config: BuildConfig = serde_json::from_str(r#"{ "context_len": 3, "max_table_cells": 1000 }"#).unwrap();
	assert_eq!(config.context_len(), 3);
	assert_eq!(config.initial_capacity(), 32768);
	assert_eq!(config.max_table_cells, Some(1000));
}

#[test]
fn summary_serializes() {
	let model = build("x y z x y", 2);
	let json = serde_json::to_value(model.summary()).unwrap();
	assert_eq!(json["vocab_size"], 3);
	assert_eq!(json["context_count"], 3);
	assert_eq!(json["status"], "Ready");
}

/// Counts computed with std collections over the same token stream.
fn reference_counts(text: &str, n: usize) -> HashMap<(Vec<String>, String), u32> {
	let tokens: Vec<String> = Tokenizer::new(text.as_bytes())
		.map(|view| view.to_string_lossy().into_owned())
		.collect();
	let mut counts = HashMap::new();
	if tokens.len() > n {
		for window in tokens.windows(n + 1) {
			*counts.entry((window[..n].to_vec(), window[n].clone())).or_insert(0) += 1;
		}
	}
	counts
}

#[test]
fn random_corpus_matches_reference_counts() {
	let mut rng = StdRng::seed_from_u64(42);
	let vocabulary: Vec<String> = (0..300).map(|i| format!("w{}", i)).collect();
	let mut text = String::new();
	for _ in 0..20_000 {
		text.push_str(&vocabulary[rng.random_range(0..vocabulary.len())]);
		text.push_str(if rng.random_bool(0.2) { "\n" } else { " " });
	}

	for n in 1..=3 {
		let mut config = BuildConfig::new(n).unwrap();
		// Small tables force several resizes during the build
		config.set_initial_capacity(8).unwrap();
		let model = NGramModel::build(text.as_bytes(), &config).unwrap();

		let reference = reference_counts(&text, n);
		let total: u32 = reference.values().sum();
		assert_eq!(model.table().total(), total as u64);
		assert!(model.summary().context_table_resizes > 0);

		for ((context, next), count) in &reference {
			let names: Vec<&str> = context.iter().map(String::as_str).collect();
			let c = model.context_id_of(&names).unwrap();
			let t = model.token_id(next.as_bytes()).unwrap();
			assert_eq!(model.count(c, t), *count);
		}

		for (context, id) in model.contexts() {
			assert_eq!(context.len(), n);
			assert_eq!(model.context_id(context), Some(id));
			if let Some(probabilities) = model.table().probabilities(id) {
				let sum: f64 = probabilities.iter().sum();
				assert!((sum - 1.0).abs() < 1e-9);
			}
		}
	}
}

#[test]
fn token_ids_follow_first_occurrence() {
	let text = "c b c a b d";
	let model = build(text, 1);
	let ids: Vec<u32> = Tokenizer::new(text.as_bytes())
		.map(|view| model.token_id(view.as_bytes()).unwrap())
		.collect();
	assert_eq!(ids, vec![0, 1, 0, 2, 1, 3]);
	assert_eq!(model.token(2).unwrap().as_bytes(), b"a");
	assert_eq!(model.token(2).unwrap().offset(), 6);
}
