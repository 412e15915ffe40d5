use quiz_core::model::{Entry, VocabularyBank};
use storage::repository::{BankRepository, StorageError};
use storage::JsonBankRepository;

fn seed_file(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("bank.json");
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn loads_existing_bank_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_file(
        &dir,
        r#"{"food": [{"apple": "manzana"}], "sports": [{"run": "correr"}]}"#,
    );

    let repo = JsonBankRepository::new(&path);
    let bank = repo.load_bank().await.unwrap();

    assert_eq!(bank.total_entries(), 2);
    assert!(bank.contains(&Entry::from_bank("food", "apple", "manzana")));
}

#[tokio::test]
async fn missing_file_loads_as_empty_bank() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonBankRepository::new(dir.path().join("absent.json"));

    let bank = repo.load_bank().await.unwrap();
    assert!(bank.is_empty());
}

#[tokio::test]
async fn corrupt_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_file(&dir, "{not valid json");

    let repo = JsonBankRepository::new(&path);
    let err = repo.load_bank().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn append_persists_through_rename() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_file(&dir, r#"{"food": [{"apple": "manzana"}]}"#);
    let repo = JsonBankRepository::new(&path);

    repo.append_entry(&Entry::from_bank("sports", "run", "correr"))
        .await
        .unwrap();

    // Re-read straight from disk: the new entry must have been written out.
    let raw = std::fs::read_to_string(&path).unwrap();
    let bank: VocabularyBank = serde_json::from_str(&raw).unwrap();
    assert_eq!(bank.total_entries(), 2);
    assert!(bank.contains(&Entry::from_bank("sports", "run", "correr")));
    assert!(bank.contains(&Entry::from_bank("food", "apple", "manzana")));
}

#[tokio::test]
async fn duplicate_append_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_file(&dir, r#"{"food": [{"apple": "manzana"}]}"#);
    let before = std::fs::read_to_string(&path).unwrap();
    let repo = JsonBankRepository::new(&path);

    let err = repo
        .append_entry(&Entry::from_bank("food", "apple", "manzana"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Duplicate));

    let after = std::fs::read_to_string(&path).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn new_answer_for_existing_prompt_merges_into_slot() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_file(&dir, r#"{"food": [{"apple": "manzana"}]}"#);
    let repo = JsonBankRepository::new(&path);

    repo.append_entry(&Entry::from_bank("food", "apple", "pomme"))
        .await
        .unwrap();

    let bank = repo.load_bank().await.unwrap();
    assert_eq!(bank.total_entries(), 1);
    assert!(bank.contains(&Entry::from_bank("food", "apple", "pomme")));
}

#[tokio::test]
async fn append_creates_file_when_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("bank.json");
    let repo = JsonBankRepository::new(&path);

    repo.append_entry(&Entry::from_bank("food", "apple", "manzana"))
        .await
        .unwrap();

    assert!(path.exists());
    let bank = repo.load_bank().await.unwrap();
    assert_eq!(bank.total_entries(), 1);
}
