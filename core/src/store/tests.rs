use super::*;
use crate::types::Estado;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

mod common {
    use super::*;

    /// 2023-11-14 22:13:20 UTC.
    pub(super) fn now() -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(1_700_000_000_000)
    }

    pub(super) fn file_store(dir: &TempDir) -> RecordStore<FileSlot> {
        let config = Config {
            base_path: dir.path().to_path_buf(),
        };
        RecordStore::open_in(&config)
    }

    pub(super) fn draft_perez() -> Draft {
        let mut draft = Draft::new();
        draft.set(FieldName::Apellido, "Perez").unwrap();
        draft.set(FieldName::Nombre, "Juan").unwrap();
        draft.set(FieldName::Telefono, "1234").unwrap();
        draft.set(FieldName::Producto, "tv").unwrap();
        draft.set(FieldName::CodigoProducto, "x1").unwrap();
        draft.set(FieldName::FechaCompra, "2024-01-01").unwrap();
        draft
    }

    pub(super) fn draft_gomez() -> Draft {
        let mut draft = Draft::new();
        draft.set(FieldName::Apellido, "Gomez").unwrap();
        draft.set(FieldName::Nombre, "Ana").unwrap();
        draft.set(FieldName::Telefono, "5678").unwrap();
        draft.set(FieldName::Producto, "Heladera").unwrap();
        draft.set(FieldName::CodigoProducto, "H9").unwrap();
        draft.set(FieldName::FechaCompra, "2024-02-02").unwrap();
        draft.set(FieldName::Estado, "Expirada").unwrap();
        draft
    }
}

mod add {
    use super::common::*;
    use super::*;

    #[test]
    fn test_add_normalizes_and_fills_derived_fields() {
        let mut store = RecordStore::in_memory();

        let record = store.add(draft_perez(), now()).unwrap();

        assert_eq!(record.apellido, "PEREZ");
        assert_eq!(record.nombre, "JUAN");
        assert_eq!(record.producto, "TV");
        assert_eq!(record.codigo_producto, "X1");
        assert_eq!(record.fecha_del_dia, "2023-11-14");
        assert_eq!(record.estado, Estado::Activa);
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0], record);
    }

    #[test]
    fn test_add_missing_required_field_fails_coarsely() {
        let mut store = RecordStore::in_memory();

        let mut draft = draft_perez();
        draft.set(FieldName::Telefono, "").unwrap();

        let result = store.add(draft, now());
        assert!(matches!(result, Err(StoreError::MissingRequiredField)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_without_optional_fields_succeeds() {
        let mut store = RecordStore::in_memory();

        // observaciones and estado are not required
        let record = store.add(draft_perez(), now()).unwrap();

        assert_eq!(record.observaciones, "");
        assert_eq!(record.estado, Estado::Activa);
    }

    #[test]
    fn test_add_assigns_unique_ids_for_equal_timestamps() {
        let mut store = RecordStore::in_memory();

        let first = store.add(draft_perez(), now()).unwrap();
        let second = store.add(draft_gomez(), now()).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_takes_estado_from_draft() {
        let mut store = RecordStore::in_memory();

        let record = store.add(draft_gomez(), now()).unwrap();

        assert_eq!(record.estado, Estado::Expirada);
    }

    #[test]
    fn test_add_clears_store_draft() {
        let mut store = RecordStore::in_memory();
        store
            .update_draft_field(FieldName::Apellido, "Lopez")
            .unwrap();

        store.add(draft_perez(), now()).unwrap();

        assert!(store.draft().is_empty());
    }

    #[test]
    fn test_unknown_estado_rejected_at_draft_time() {
        let mut draft = Draft::new();
        let result = draft.set(FieldName::Estado, "Rota");

        assert!(result.is_err());
        assert_eq!(draft.get(FieldName::Estado), None);
    }
}

mod edit {
    use super::common::*;
    use super::*;

    #[test]
    fn test_begin_edit_copies_record_into_draft() {
        let mut store = RecordStore::in_memory();
        let id = store.add(draft_perez(), now()).unwrap().id;

        store.begin_edit(id).unwrap();

        assert_eq!(store.edit_target(), Some(id));
        assert_eq!(store.draft().get(FieldName::Apellido), Some("PEREZ"));
        assert_eq!(store.draft().get(FieldName::Estado), Some("Activa"));
    }

    #[test]
    fn test_begin_edit_unknown_id_fails() {
        let mut store = RecordStore::in_memory();

        let result = store.begin_edit(RecordId::from(42));

        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.edit_target(), None);
    }

    #[test]
    fn test_commit_without_begin_fails() {
        let mut store = RecordStore::in_memory();
        store.add(draft_perez(), now()).unwrap();

        let result = store.commit_edit();

        assert!(matches!(result, Err(StoreError::NoActiveEdit)));
    }

    #[test]
    fn test_commit_edit_merges_changed_field_only() {
        let mut store = RecordStore::in_memory();
        let original = store.add(draft_perez(), now()).unwrap();

        store.begin_edit(original.id).unwrap();
        store
            .update_draft_field(FieldName::Telefono, "9999")
            .unwrap();
        let committed = store.commit_edit().unwrap();

        assert_eq!(committed.id, original.id);
        assert_eq!(committed.telefono, "9999");
        assert_eq!(committed.apellido, original.apellido);
        assert_eq!(committed.fecha_del_dia, original.fecha_del_dia);
        assert_eq!(store.edit_target(), None);
        assert!(store.draft().is_empty());
    }

    #[test]
    fn test_update_draft_field_uppercases_except_estado() {
        let mut store = RecordStore::in_memory();
        let id = store.add(draft_perez(), now()).unwrap().id;

        store.begin_edit(id).unwrap();
        store
            .update_draft_field(FieldName::Nombre, "maría")
            .unwrap();
        store
            .update_draft_field(FieldName::Observaciones, "sin cargador")
            .unwrap();
        store
            .update_draft_field(FieldName::Estado, "En revisión")
            .unwrap();
        let committed = store.commit_edit().unwrap();

        assert_eq!(committed.nombre, "MARÍA");
        assert_eq!(committed.observaciones, "SIN CARGADOR");
        assert_eq!(committed.estado, Estado::EnRevision);
        assert_eq!(committed.estado.as_str(), "En revisión");
    }

    #[test]
    fn test_new_edit_discards_previous_draft() {
        let mut store = RecordStore::in_memory();
        let first = store.add(draft_perez(), now()).unwrap();
        let second = store.add(draft_gomez(), now()).unwrap();

        store.begin_edit(first.id).unwrap();
        store
            .update_draft_field(FieldName::Telefono, "0000")
            .unwrap();
        store.begin_edit(second.id).unwrap();
        let committed = store.commit_edit().unwrap();

        // The unsaved change to the first record is gone.
        assert_eq!(committed.id, second.id);
        assert_eq!(store.get(first.id).unwrap().telefono, "1234");
    }

    #[test]
    fn test_remove_cancels_edit_session_for_same_record() {
        let mut store = RecordStore::in_memory();
        let id = store.add(draft_perez(), now()).unwrap().id;

        store.begin_edit(id).unwrap();
        store.remove(id).unwrap();

        assert_eq!(store.edit_target(), None);
        assert!(matches!(
            store.commit_edit(),
            Err(StoreError::NoActiveEdit)
        ));
    }

    #[test]
    fn test_cancel_edit_clears_session() {
        let mut store = RecordStore::in_memory();
        let id = store.add(draft_perez(), now()).unwrap().id;

        store.begin_edit(id).unwrap();
        store.cancel_edit();

        assert_eq!(store.edit_target(), None);
        assert!(store.draft().is_empty());
    }
}

mod remove {
    use super::common::*;
    use super::*;

    #[test]
    fn test_remove_drops_record_from_collection_and_filters() {
        let mut store = RecordStore::in_memory();
        let first = store.add(draft_perez(), now()).unwrap();
        store.add(draft_gomez(), now()).unwrap();

        store.remove(first.id).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get(first.id).is_none());
        let query = FilterQuery::new(FieldName::Apellido, "PEREZ");
        assert_eq!(store.filter(&query).count(), 0);
    }

    #[test]
    fn test_remove_unknown_id_fails_and_leaves_collection_unchanged() {
        let mut store = RecordStore::in_memory();
        store.add(draft_perez(), now()).unwrap();

        let result = store.remove(RecordId::from(7));

        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.len(), 1);
    }
}

mod filtering {
    use super::common::*;
    use super::*;

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let mut store = RecordStore::in_memory();
        store.add(draft_perez(), now()).unwrap();

        let query = FilterQuery::new(FieldName::Producto, "tv");
        let matched: Vec<_> = store.filter(&query).collect();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].producto, "TV");
    }

    #[test]
    fn test_filter_estado_matches_exact_subset_in_order() {
        let mut store = RecordStore::in_memory();
        let activa = store.add(draft_perez(), now()).unwrap();
        store.add(draft_gomez(), now()).unwrap(); // Expirada

        let mut third = draft_perez();
        third.set(FieldName::Apellido, "Diaz").unwrap();
        let activa2 = store.add(third, now()).unwrap();

        let query = FilterQuery::new(FieldName::Estado, "Activa");
        let ids: Vec<_> = store.filter(&query).map(|r| r.id).collect();

        assert_eq!(ids, vec![activa.id, activa2.id]);
    }
}

mod persistence {
    use super::common::*;
    use super::*;

    #[test]
    fn test_file_round_trip_preserves_collection() {
        let temp = TempDir::new().unwrap();

        let mut store = file_store(&temp);
        store.add(draft_perez(), now()).unwrap();
        store.add(draft_gomez(), now()).unwrap();
        let before = store.records().to_vec();
        drop(store);

        let reloaded = file_store(&temp);
        assert_eq!(reloaded.records(), before.as_slice());
    }

    #[test]
    fn test_memory_round_trip_via_slot() {
        let mut store = RecordStore::in_memory();
        store.add(draft_perez(), now()).unwrap();
        let before = store.records().to_vec();

        let reloaded = RecordStore::open(store.into_slot());
        assert_eq!(reloaded.records(), before.as_slice());
    }

    #[test]
    fn test_undecodable_blob_falls_back_to_empty() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            base_path: temp.path().to_path_buf(),
        };
        std::fs::write(config.records_path(), "not json at all").unwrap();

        let store = RecordStore::open_in(&config);

        assert!(store.is_empty());
    }

    #[test]
    fn test_legacy_array_blob_loads_and_is_rewritten_as_envelope() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            base_path: temp.path().to_path_buf(),
        };

        // Older deployments stored a bare array, camelCase keys, with no
        // estado or observaciones on early rows.
        let legacy = r#"[{
            "id": 1718000000000,
            "apellido": "PEREZ",
            "nombre": "JUAN",
            "telefono": "1234",
            "producto": "TV",
            "codigoProducto": "X1",
            "fechaCompra": "2024-01-01",
            "fechaDelDia": "2024-06-10"
        }]"#;
        std::fs::write(config.records_path(), legacy).unwrap();

        let mut store = RecordStore::open_in(&config);
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].estado, Estado::Activa);
        assert_eq!(store.records()[0].observaciones, "");

        store.add(draft_gomez(), now()).unwrap();

        let blob = std::fs::read_to_string(config.records_path()).unwrap();
        assert!(blob.contains("\"version\":1"));

        let reloaded = RecordStore::open_in(&config);
        assert_eq!(reloaded.len(), 2);
    }
}
