//! End-to-end scenarios: known vectors and source-code comparisons.

use std::collections::HashSet;
use std::fs;

use aether::config::{find_project_config, user_config_dir, user_config_path};
use aether::text::{normalize_whitespace, tokenize_code};
use aether::{
    digest_hex, jaccard_similarity, jaccard_similarity_of, rolling_hash, simhash, winnow,
    FingerprintConfig, HammingDistance, HashAlgorithm, SimHash, Winnower,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::tempdir;

const FACTORIAL_A: &str = "
def factorial(n):
    # Calculate factorial
    if n <= 1:
        return 1
    return n * factorial(n - 1)

def main():
    print(factorial(5))
";

const FACTORIAL_B: &str = "
def factorial(num):
    # Compute factorial
    if num <= 1:
        return 1
    return num * factorial(num - 1)

def main():
    print(factorial(5))
";

const UNRELATED: &str = "
class Stack:
    def __init__(self):
        self.items = []

    def push(self, item):
        self.items.append(item)
";

#[test]
fn known_vectors() {
    assert_eq!(rolling_hash("ab", 256, 101).unwrap(), vec![0, 97, 84]);
    assert_eq!(
        digest_hex("hello world", HashAlgorithm::Md5),
        "5eb63bbbe01eeed093cb22bb8f5acdc3"
    );
    assert_eq!(
        digest_hex("", HashAlgorithm::Md5),
        "d41d8cd98f00b204e9800998ecf8427e"
    );

    let fps = winnow("aaaaaaaaaa", 2, 2).unwrap();
    assert_eq!(fps.len(), 1);
    assert_eq!(fps[0].position, 0);

    let empty: HashSet<u32> = HashSet::new();
    assert_eq!(jaccard_similarity(&empty, &empty), 1.0);
    assert_eq!(jaccard_similarity_of([1, 2, 3], [2, 3, 4]), 0.5);
}

#[test]
fn renamed_code_scores_above_unrelated_code() {
    let winnower = Winnower::default();
    let a = winnower.fingerprint_hashes(&normalize_whitespace(FACTORIAL_A));
    let b = winnower.fingerprint_hashes(&normalize_whitespace(FACTORIAL_B));
    let c = winnower.fingerprint_hashes(&normalize_whitespace(UNRELATED));

    let close = jaccard_similarity(&a, &b);
    let far = jaccard_similarity(&a, &c);
    assert!(close > far, "close={close} far={far}");
    assert!(close > 0.0);
}

#[test]
fn simhash_tracks_near_duplicates() {
    let a = simhash("the quick brown fox jumps over the lazy dog", 64).unwrap();
    let b = simhash("the quick brown fox jumped over the lazy dog", 64).unwrap();
    assert_eq!(a.hamming_distance(&b), 7);

    let sh = SimHash::default();
    let ta = sh.signature_from_tokens(tokenize_code(FACTORIAL_A));
    let tb = sh.signature_from_tokens(tokenize_code(FACTORIAL_B));
    let tc = sh.signature_from_tokens(tokenize_code(UNRELATED));
    assert!(ta.hamming_distance(&tb) < ta.hamming_distance(&tc));
}

#[test]
fn edits_only_disturb_nearby_fingerprints() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let alphabet: Vec<char> = "abcdefgh ".chars().collect();
    let (k, w) = (5, 4);

    for _ in 0..50 {
        let original: Vec<char> = (0..300)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        let edit_at = rng.gen_range(0..original.len());
        let mut edited = original.clone();
        edited[edit_at] = 'z';

        let before = winnow(&original.iter().collect::<String>(), k, w).unwrap();
        let after = winnow(&edited.iter().collect::<String>(), k, w).unwrap();

        let untouched = |p: usize| p + w + k - 2 < edit_at;
        let left: Vec<_> = before.iter().filter(|f| untouched(f.position)).collect();
        let right: Vec<_> = after.iter().filter(|f| untouched(f.position)).collect();
        assert_eq!(left, right, "edit at {edit_at}");
    }
}

#[test]
fn config_file_drives_primitives() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path();
    let nested = dir.join("src").join("pkg");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        dir.join("pyproject.toml"),
        "[tool.aether]\nkgram_size = 3\nwindow_size = 2\nsimhash_bits = 128\n",
    )
    .unwrap();

    let path = find_project_config(&nested).unwrap();
    assert_eq!(path, dir.join("pyproject.toml"));

    let config = FingerprintConfig::from_file(&path).unwrap();
    config.validate().unwrap();
    assert_eq!(config.winnower().unwrap(), Winnower::new(3, 2).unwrap());
    assert_eq!(config.simhash().unwrap().signature("a b").num_bits(), 128);

    // aether.toml in the same directory takes priority.
    fs::write(dir.join("aether.toml"), "[aether]\nkgram_size = 4\n").unwrap();
    let path = find_project_config(&nested).unwrap();
    assert_eq!(path, dir.join("aether.toml"));
    assert_eq!(FingerprintConfig::from_file(&path).unwrap().kgram_size, 4);
}

#[test]
fn missing_config_file_is_a_configuration_error() {
    let err = FingerprintConfig::from_file("/nonexistent/aether.toml").unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn env_overrides_apply_and_ignore_garbage() {
    std::env::set_var("AETHER_SIMHASH_BITS", "256");
    std::env::set_var("AETHER_DIGEST", "md5");
    std::env::set_var("AETHER_WINDOW_SIZE", "not-a-number");

    let config = FingerprintConfig::default().with_env_overrides();
    assert_eq!(config.simhash_bits, 256);
    assert_eq!(config.digest, HashAlgorithm::Md5);
    assert_eq!(config.window_size, 4);

    std::env::remove_var("AETHER_SIMHASH_BITS");
    std::env::remove_var("AETHER_DIGEST");
    std::env::remove_var("AETHER_WINDOW_SIZE");
}

#[test]
fn saved_config_loads_back() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested").join("aether.toml");
    let config = FingerprintConfig {
        kgram_size: 8,
        simhash_bits: 192,
        digest: HashAlgorithm::Sha1,
        ..Default::default()
    };
    config.save(&path).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("[aether]"));
    assert_eq!(FingerprintConfig::from_file(&path).unwrap(), config);
}

#[test]
fn project_config_overrides_user_config() {
    let tmp = tempdir().unwrap();
    let user = tmp.path().join("user.toml");
    let project = tmp.path().join("pyproject.toml");
    fs::write(
        &user,
        "[aether]\nkgram_size = 7\nwindow_size = 6\ndigest = \"md5\"\n",
    )
    .unwrap();
    fs::write(&project, "[tool.aether]\nwindow_size = 3\n").unwrap();

    let (user, project) = (user.as_path(), project.as_path());
    let config = FingerprintConfig::load_layered(Some(user), Some(project)).unwrap();
    assert_eq!(config.kgram_size, 7);
    assert_eq!(config.window_size, 3);
    assert_eq!(config.digest, HashAlgorithm::Md5);
    assert_eq!(config.simhash_bits, 64);

    let user_only = FingerprintConfig::load_layered(Some(user), None).unwrap();
    assert_eq!(user_only.window_size, 6);
    assert_eq!(
        FingerprintConfig::load_layered(None, None).unwrap(),
        FingerprintConfig::default()
    );

    let missing = tmp.path().join("absent.toml");
    let err = FingerprintConfig::load_layered(Some(missing.as_path()), Some(project)).unwrap_err();
    assert!(err.is_configuration());
}

#[cfg(not(windows))]
#[test]
fn user_config_dir_follows_xdg() {
    let tmp = tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", tmp.path());
    assert_eq!(user_config_dir(), Some(tmp.path().join("aether")));
    assert_eq!(
        user_config_path(),
        Some(tmp.path().join("aether").join("aether.toml"))
    );

    FingerprintConfig {
        kgram_size: 6,
        ..Default::default()
    }
    .save(user_config_path().unwrap())
    .unwrap();
    let project_root = tmp.path().join("project");
    fs::create_dir_all(&project_root).unwrap();
    fs::write(project_root.join("aether.toml"), "[aether]\nwindow_size = 2\n").unwrap();

    let config = FingerprintConfig::discover(&project_root).unwrap();
    assert_eq!(config.kgram_size, 6);
    assert_eq!(config.window_size, 2);
    std::env::remove_var("XDG_CONFIG_HOME");
}
