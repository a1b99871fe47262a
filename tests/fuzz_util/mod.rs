#![allow(dead_code)]

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use varstruct::schema::{FieldKind, Schema, SchemaBuilder};

#[derive(Debug, Clone, Copy)]
pub struct FuzzParams {
    pub seed: u64,
    pub steps: usize,
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).ok().as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.trim().parse::<u64>().ok()
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.trim().parse::<usize>().ok()
}

fn mix_seed(mut seed: u64, tag: &str) -> u64 {
    // Stable per-tag stream from one base seed.
    for (i, b) in tag.as_bytes().iter().enumerate() {
        seed ^= (*b as u64) << ((i % 8) * 8);
        seed = seed.rotate_left(13).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    }
    seed
}

pub fn params(test_tag: &str, default_steps: usize) -> FuzzParams {
    let base_seed = env_u64("VARSTRUCT_FUZZ_SEED").unwrap_or(0x5EED_0F5C_4E4A_0001);
    let steps = env_usize("VARSTRUCT_FUZZ_STEPS").unwrap_or(default_steps);

    FuzzParams {
        seed: mix_seed(base_seed, test_tag),
        steps,
    }
}

pub fn verbose() -> bool {
    env_flag("VARSTRUCT_FUZZ_VERBOSE")
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Build a schema of up to `max_fields` fields with random kinds and
/// element sizes from 1 to 16 bytes.
pub fn random_schema(rng: &mut StdRng, max_fields: usize) -> Arc<Schema> {
    let mut builder = SchemaBuilder::new("Fuzz");
    let count = rng.gen_range(0..=max_fields);
    for _ in 0..count {
        let element_size = rng.gen_range(1usize..=16);
        let is_array = rng.gen_bool(0.5);
        builder
            .declare(element_size, is_array)
            .expect("nonzero element size");
    }
    builder.build()
}

/// One length per array field of `schema`, each below `max_len`.
pub fn random_lengths(rng: &mut StdRng, schema: &Schema, max_len: usize) -> Vec<usize> {
    schema
        .slots()
        .iter()
        .filter(|slot| slot.kind() == FieldKind::Array)
        .map(|_| rng.gen_range(0..max_len))
        .collect()
}
