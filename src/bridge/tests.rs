use super::*;
use crate::bridge::format::{HEADER_SIZE, MAGIC_NUMBER};
use crate::config::CodecConfig;
use crate::error::HuffmanError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;

/// A fresh directory per test; tests run in parallel.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("huffman_core_bridge_tests")
        .join(format!("{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Compresses `data` through files and returns (container bytes, restored bytes).
fn file_roundtrip(name: &str, data: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let dir = scratch_dir(name);
    let original = dir.join("input.bin");
    let packed = dir.join("input.huff");
    let restored = dir.join("restored.bin");

    fs::write(&original, data).unwrap();
    compress(&original, &packed).unwrap();
    decompress(&packed, &restored).unwrap();

    let result = (fs::read(&packed).unwrap(), fs::read(&restored).unwrap());
    fs::remove_dir_all(&dir).unwrap();
    result
}

/// Deterministic English-like text built from a small weighted vocabulary.
fn generate_text(size: usize, seed: u64) -> Vec<u8> {
    const WORDS: &[&str] = &[
        "the", "of", "and", "to", "in", "a", "is", "that", "for", "it", "as", "was",
        "with", "be", "by", "on", "not", "he", "this", "are", "or", "his", "from",
        "at", "which", "but", "have", "an", "had", "they", "you", "were", "their",
        "one", "all", "we", "can", "her", "has", "there", "been", "if", "more",
        "when", "will", "would", "who", "so", "no", "compression", "symbol", "tree",
    ];
    let mut rng = StdRng::seed_from_u64(seed);
    let mut text = Vec::with_capacity(size + 16);
    while text.len() < size {
        // Skew towards the front of the list, like real word frequencies.
        let a = rng.random_range(0..WORDS.len());
        let b = rng.random_range(0..WORDS.len());
        text.extend_from_slice(WORDS[a.min(b)].as_bytes());
        if rng.random_range(0..12) == 0 {
            text.extend_from_slice(b". ");
        } else {
            text.push(b' ');
        }
    }
    text.truncate(size);
    text
}

fn generate_random_bytes(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size).map(|_| rng.random::<u8>()).collect()
}

//==================================================================================
// Scenarios
//==================================================================================

#[test]
fn test_empty_file_roundtrip() {
    let (packed, restored) = file_roundtrip("scenario_empty", b"");
    assert!(packed.is_empty(), "empty input must produce a zero-length file");
    assert!(restored.is_empty());
}

#[test]
fn test_single_repeated_byte_roundtrip() {
    let (packed, restored) = file_roundtrip("scenario_aaaa", b"aaaa");
    assert_eq!(restored, b"aaaa");
    // One 1-bit code per symbol: four bits, padded to one byte.
    assert_eq!(packed.len(), HEADER_SIZE + 1);
    assert_eq!(packed[HEADER_SIZE], 0);
}

#[test]
fn test_two_symbol_roundtrip() {
    let (packed, restored) = file_roundtrip("scenario_abab", b"abababab");
    assert_eq!(restored, b"abababab");
    assert_eq!(packed.len(), HEADER_SIZE + 1);
}

#[test]
fn test_natural_text_shrinks_and_roundtrips() {
    let text = generate_text(100_000, 7);
    let (packed, restored) = file_roundtrip("scenario_text", &text);
    assert!(
        packed.len() < text.len(),
        "compressed {} bytes to {} bytes",
        text.len(),
        packed.len()
    );
    assert_eq!(restored, text);
}

//==================================================================================
// Container invariants
//==================================================================================

#[test]
fn test_header_records_magic_and_length() {
    let data = b"header invariants hold for every non-empty input";
    let packed = compress_bytes(data).unwrap();
    assert_eq!(&packed[0..4], &MAGIC_NUMBER.to_le_bytes());
    assert_eq!(&packed[0..4], b"FFUH");
    assert_eq!(
        u64::from_le_bytes(packed[4..12].try_into().unwrap()),
        data.len() as u64
    );
}

#[test]
fn test_frequency_table_sums_to_length() {
    let data = generate_random_bytes(5_000, 11);
    let packed = compress_bytes(&data).unwrap();
    let stored_len = u64::from_le_bytes(packed[4..12].try_into().unwrap());
    let sum: u64 = packed[12..HEADER_SIZE]
        .chunks_exact(8)
        .map(|c| u64::from_le_bytes(c.try_into().unwrap()))
        .sum();
    assert_eq!(sum, stored_len);

    // And each slot is the true count of its byte value.
    let at = 12 + data[0] as usize * 8;
    let slot = u64::from_le_bytes(packed[at..at + 8].try_into().unwrap());
    let actual = data.iter().filter(|&&b| b == data[0]).count() as u64;
    assert_eq!(slot, actual);
}

#[test]
fn test_compression_is_deterministic() {
    let data = generate_text(20_000, 3);
    assert_eq!(compress_bytes(&data).unwrap(), compress_bytes(&data).unwrap());
}

#[test]
fn test_random_streams_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for _ in 0..20 {
        let len = rng.random_range(0..4096);
        // Narrow the alphabet on some runs to get skewed trees.
        let alphabet = rng.random_range(1..=256u16);
        let data: Vec<u8> = (0..len)
            .map(|_| (rng.random_range(0..alphabet)) as u8)
            .collect();
        let packed = compress_bytes(&data).unwrap();
        assert_eq!(decompress_bytes(&packed).unwrap(), data);
    }
}

#[test]
fn test_all_byte_values_roundtrip() {
    let data: Vec<u8> = (0..=255u8).cycle().take(256 * 5 + 17).collect();
    let (_, restored) = file_roundtrip("all_bytes", &data);
    assert_eq!(restored, data);
}

//==================================================================================
// Failure handling
//==================================================================================

#[test]
fn test_corrupt_magic_fails_and_leaves_no_output() {
    let dir = scratch_dir("corrupt_magic");
    let packed = dir.join("data.huff");
    let restored = dir.join("data.out");

    let mut bytes = compress_bytes(b"a perfectly good container").unwrap();
    bytes[1] ^= 0x01;
    fs::write(&packed, &bytes).unwrap();

    let result = decompress(&packed, &restored);
    assert!(matches!(result, Err(HuffmanError::FormatInvalid(_))));
    assert!(!restored.exists());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1, "no temp file left behind");
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_truncated_body_fails_and_leaves_no_output() {
    let dir = scratch_dir("truncated_body");
    let packed = dir.join("data.huff");
    let restored = dir.join("data.out");

    let mut bytes = compress_bytes(&generate_text(2_000, 5)).unwrap();
    bytes.truncate(HEADER_SIZE + 10);
    fs::write(&packed, &bytes).unwrap();

    let result = decompress(&packed, &restored);
    assert!(matches!(result, Err(HuffmanError::StreamTruncated { .. })));
    assert!(!restored.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_failed_decompress_keeps_unrelated_partial_file() {
    let dir = scratch_dir("partial_sibling");
    let packed = dir.join("bad.huff");
    let restored = dir.join("out.bin");
    let sibling = dir.join("out.bin.partial");
    fs::write(&packed, b"garbage that is not a container").unwrap();
    fs::write(&sibling, b"a file the user cares about").unwrap();

    assert!(decompress(&packed, &restored).is_err());
    assert_eq!(fs::read(&sibling).unwrap(), b"a file the user cares about");
    assert!(!restored.exists());
    // Only the two files written above remain; the temp file is gone.
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 2);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_truncated_header_is_format_invalid() {
    let bytes = compress_bytes(b"short").unwrap();
    let result = decompress_bytes(&bytes[..HEADER_SIZE / 2]);
    assert!(matches!(result, Err(HuffmanError::FormatInvalid(_))));
}

#[test]
fn test_failed_decompress_keeps_existing_output() {
    let dir = scratch_dir("keep_existing");
    let packed = dir.join("bad.huff");
    let restored = dir.join("existing.txt");
    fs::write(&packed, b"garbage that is not a container").unwrap();
    fs::write(&restored, b"keep me").unwrap();

    assert!(decompress(&packed, &restored).is_err());
    assert_eq!(fs::read(&restored).unwrap(), b"keep me");
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_in_place_mode_removes_output_on_failure() {
    let dir = scratch_dir("in_place_failure");
    let packed = dir.join("bad.huff");
    let restored = dir.join("out.bin");
    fs::write(&packed, b"nope").unwrap();

    let config = CodecConfig {
        atomic_output: false,
        ..CodecConfig::default()
    };
    assert!(decompress_with_config(&packed, &restored, &config).is_err());
    assert!(!restored.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_input_is_input_unreadable() {
    let dir = scratch_dir("missing_input");
    let output = dir.join("out.huff");
    let result = compress(dir.join("does_not_exist.txt"), &output);
    match result {
        Err(HuffmanError::InputUnreadable { path, .. }) => {
            assert!(path.ends_with("does_not_exist.txt"))
        }
        other => panic!("Expected InputUnreadable, got {:?}", other),
    }
    assert!(!output.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unwritable_output_is_output_unwritable() {
    let dir = scratch_dir("unwritable_output");
    let input = dir.join("in.txt");
    fs::write(&input, b"some data").unwrap();
    let result = compress(&input, dir.join("no_such_dir").join("out.huff"));
    assert!(matches!(result, Err(HuffmanError::OutputUnwritable { .. })));
    fs::remove_dir_all(&dir).unwrap();
}

//==================================================================================
// Configuration
//==================================================================================

#[test]
fn test_custom_config_roundtrip_through_files() {
    let dir = scratch_dir("custom_config");
    let original = dir.join("in.bin");
    let packed = dir.join("in.huff");
    let restored = dir.join("out.bin");
    let data = generate_text(10_000, 42);
    fs::write(&original, &data).unwrap();

    let config = CodecConfig::from_json_str(
        r#"{ "magic": 3735928559, "buffer_capacity": 7, "atomic_output": false }"#,
    )
    .unwrap();
    let report = compress_with_config(&original, &packed, &config).unwrap();
    assert_eq!(report.original_len, data.len() as u64);
    assert_eq!(report.compressed_len, fs::metadata(&packed).unwrap().len());

    // The default magic does not accept a container written with another one.
    assert!(matches!(
        decompress(&packed, &restored),
        Err(HuffmanError::FormatInvalid(_))
    ));

    let decoded = decompress_with_config(&packed, &restored, &config).unwrap();
    assert_eq!(decoded, data.len() as u64);
    assert_eq!(fs::read(&restored).unwrap(), data);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_analyze_file_matches_report() {
    let dir = scratch_dir("analyze_file");
    let original = dir.join("in.txt");
    let packed = dir.join("in.huff");
    fs::write(&original, generate_text(20_000, 9)).unwrap();

    let report = compress_with_config(&original, &packed, &CodecConfig::default()).unwrap();
    let stats = analyze(&packed).unwrap();
    assert_eq!(stats.total_size, report.compressed_len);
    assert_eq!(stats.original_len, report.original_len);
    assert_eq!(stats.distinct_symbols, report.distinct_symbols);
    assert_eq!(stats.max_code_len, report.max_code_len);
    assert!(stats.is_complete());
    assert!(stats.compression_ratio < 1.0);
    fs::remove_dir_all(&dir).unwrap();
}
