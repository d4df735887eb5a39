use super::*;
use crate::types::Account;
use tempfile::TempDir;

mod common {
    use super::*;
    use crate::types::Nickname;

    pub(super) fn account(nickname: &str) -> Account {
        Account {
            nickname: Nickname::try_new(nickname.to_string()).unwrap(),
            password: "secreta".to_string(),
        }
    }
}

mod envelope {
    use super::common::*;
    use super::*;

    #[test]
    fn test_encode_then_decode_round_trips() {
        let accounts = vec![account("ana"), account("juan")];

        let blob = encode(&accounts).unwrap();
        assert!(blob.contains("\"version\":1"));

        let decoded: Vec<Account> = decode(&blob).unwrap();
        assert_eq!(decoded, accounts);
    }

    #[test]
    fn test_decode_accepts_legacy_bare_array() {
        let blob = r#"[{"nickname":"ana","password":"secreta"}]"#;

        let decoded: Vec<Account> = decode(blob).unwrap();
        assert_eq!(decoded, vec![account("ana")]);
    }

    #[test]
    fn test_decode_rejects_unsupported_version() {
        let blob = r#"{"version":9,"records":[]}"#;

        assert_eq!(decode::<Account>(blob), None);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode::<Account>("{{{"), None);
        assert_eq!(decode::<Account>(""), None);
    }
}

mod file_slot {
    use super::*;

    #[test]
    fn test_read_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        let slot = FileSlot::new(temp.path().join("garantias.json"));

        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let temp = TempDir::new().unwrap();
        let mut slot = FileSlot::new(temp.path().join("garantias.json"));

        slot.write("{}").unwrap();

        assert_eq!(slot.read().unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let mut slot = FileSlot::new(temp.path().join("nested/dir/garantias.json"));

        slot.write("[]").unwrap();

        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
    }
}

mod memory_slot {
    use super::*;

    #[test]
    fn test_starts_empty_and_holds_last_write() {
        let mut slot = MemorySlot::new();
        assert_eq!(slot.read().unwrap(), None);

        slot.write("first").unwrap();
        slot.write("second").unwrap();

        assert_eq!(slot.blob(), Some("second"));
        assert_eq!(slot.read().unwrap().as_deref(), Some("second"));
    }
}
