use folha_core::draft::TransactionDraft;
use folha_core::{RecordId, SheetRecord, Transaction};
use folha_engine::SyncEngine;
use folha_harness::{FailingWorkbook, TestPeer};
use folha_sheets::{CsvWorkbook, RangeSpec, SheetStore, WorkbookConfig};
use folha_storage::SqliteStorage;

// ============================================================================
// Incremental propagation: create / update / delete
// ============================================================================

#[test]
fn create_appends_projected_row() -> Result<(), Box<dyn std::error::Error>> {
    let mut peer = TestPeer::new()?;
    let tx = peer
        .engine
        .create_transaction(TestPeer::expense("Farinha", 45.90, "2024-03-10"))?;

    // Persisted with a generated identifier.
    assert_eq!(peer.engine.get_transaction(tx.id)?, Some(tx.clone()));

    // Mirrored: header plus one projected row.
    let rows = peer.tab("Financeiro");
    assert_eq!(rows.len(), 2);
    let row = &rows[1];
    assert_eq!(row[0], tx.id.to_string());
    assert_eq!(row[1], "10/03/2024");
    assert_eq!(row[2], "Despesa");
    assert_eq!(row[3], "Insumos");
    assert_eq!(row[5], "45.9");
    assert_eq!(row[9], "Pago");
    assert_eq!(row.len(), Transaction::schema().width());
    Ok(())
}

#[test]
fn create_from_loose_json_body() -> Result<(), Box<dyn std::error::Error>> {
    let mut peer = TestPeer::new()?;
    let draft: TransactionDraft = serde_json::from_str(
        r#"{
            "type": "Receita",
            "category": "Vendas",
            "description": "Bolo 2kg",
            "amount": 180.0,
            "paymentMethod": "Dinheiro",
            "date": "10/03/2024",
            "status": "Pendente"
        }"#,
    )?;
    let tx = peer.engine.create_transaction(draft)?;
    assert_eq!(tx.payment_method, "Dinheiro");

    let rows = peer.tab("Financeiro");
    assert_eq!(rows[1][2], "Receita");
    assert_eq!(rows[1][9], "Pendente");
    Ok(())
}

#[test]
fn update_rewrites_row_in_place() -> Result<(), Box<dyn std::error::Error>> {
    let mut peer = TestPeer::new()?;
    let tx = peer
        .engine
        .create_transaction(TestPeer::expense("Farinha", 45.90, "2024-03-10"))?;
    let other = peer
        .engine
        .create_transaction(TestPeer::expense("Açúcar", 12.50, "2024-03-11"))?;

    let updated = peer
        .engine
        .update_transaction(tx.id, TestPeer::expense("Farinha especial", 51.00, "2024-03-10"))?;
    assert!(updated.is_some());

    let rows = peer.tab("Financeiro");
    // Still exactly two data rows, each in its original position.
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][0], tx.id.to_string());
    assert_eq!(rows[1][4], "Farinha especial");
    assert_eq!(rows[1][5], "51");
    assert_eq!(rows[2][0], other.id.to_string());
    Ok(())
}

#[test]
fn update_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let mut peer = TestPeer::new()?;
    let tx = peer
        .engine
        .create_transaction(TestPeer::expense("Farinha", 45.90, "2024-03-10"))?;

    let draft = TestPeer::expense("Farinha", 47.00, "2024-03-10");
    peer.engine.update_transaction(tx.id, draft.clone())?;
    let after_first: Vec<Vec<String>> = peer.tab("Financeiro").to_vec();

    peer.engine.update_transaction(tx.id, draft)?;
    assert_eq!(peer.tab("Financeiro"), &after_first[..]);
    Ok(())
}

#[test]
fn update_unknown_id_returns_none() -> Result<(), Box<dyn std::error::Error>> {
    let mut peer = TestPeer::new()?;
    let missing = peer
        .engine
        .update_transaction(RecordId::new(), TestPeer::expense("x", 1.0, "2024-03-10"))?;
    assert!(missing.is_none());
    assert_eq!(peer.tab("Financeiro").len(), 1);
    Ok(())
}

#[test]
fn delete_clears_row_preserving_positions() -> Result<(), Box<dyn std::error::Error>> {
    let mut peer = TestPeer::new()?;
    let a = peer
        .engine
        .create_transaction(TestPeer::expense("A", 1.0, "2024-03-10"))?;
    let b = peer
        .engine
        .create_transaction(TestPeer::expense("B", 2.0, "2024-03-11"))?;

    assert!(peer.engine.delete_transaction(a.id)?);
    assert_eq!(peer.engine.get_transaction(a.id)?, None);

    let rows = peer.tab("Financeiro");
    // A's row is blanked in place, B keeps position 3.
    assert_eq!(rows.len(), 3);
    assert!(rows[1].iter().all(String::is_empty));
    assert_eq!(rows[2][0], b.id.to_string());
    Ok(())
}

#[test]
fn update_with_missing_mirror_row_is_silent_noop() -> Result<(), Box<dyn std::error::Error>> {
    let mut peer = TestPeer::new()?;
    let tx = peer
        .engine
        .create_transaction(TestPeer::expense("Farinha", 45.90, "2024-03-10"))?;

    // Someone removed the row from the mirror out-of-band.
    let range = RangeSpec::parse(&Transaction::schema().full_range())?;
    peer.engine.sheets_mut().clear_row_at(&range, 2)?;

    let updated = peer
        .engine
        .update_transaction(tx.id, TestPeer::expense("Farinha", 50.00, "2024-03-10"))?;
    // Primary mutation succeeds; mirror stays untouched until the next sync.
    assert_eq!(updated.map(|t| t.amount), Some(50.00));
    assert!(peer.tab("Financeiro")[1].iter().all(String::is_empty));
    Ok(())
}

// ============================================================================
// Partial-failure isolation
// ============================================================================

#[test]
fn mirror_failure_never_fails_the_primary_mutation() -> Result<(), Box<dyn std::error::Error>> {
    let storage = SqliteStorage::open_in_memory()?;
    let mut engine = SyncEngine::new(storage, FailingWorkbook);

    let tx = engine.create_transaction(TestPeer::expense("Farinha", 45.90, "2024-03-10"))?;
    // The append failed, but the create committed and is retrievable.
    assert_eq!(engine.get_transaction(tx.id)?, Some(tx.clone()));
    assert_eq!(engine.list_transactions()?.len(), 1);

    let updated = engine.update_transaction(tx.id, TestPeer::expense("Farinha", 50.00, "2024-03-10"))?;
    assert!(updated.is_some());

    assert!(engine.delete_transaction(tx.id)?);
    assert_eq!(engine.get_transaction(tx.id)?, None);
    Ok(())
}

// ============================================================================
// All three entities mirror
// ============================================================================

#[test]
fn inventory_and_orders_mirror_too() -> Result<(), Box<dyn std::error::Error>> {
    let mut peer = TestPeer::new()?;

    let item = peer.engine.create_item(TestPeer::item("FAR-01", "Farinha", 12.0))?;
    let rows = peer.tab("Estoque");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], item.id.to_string());
    assert_eq!(rows[1][1], "FAR-01");
    assert_eq!(rows[1][3], "12");

    let mut draft = TestPeer::order("Ana", 180.0, "15/03/2024 18:30");
    draft.address = "Rua das Flores 12".into();
    let order = peer.engine.create_order(draft)?;
    let rows = peer.tab("Pedidos");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], order.id.to_string());
    assert_eq!(rows[1][2], "15/03/2024 18:30");
    // Address stays primary-store only.
    assert!(!rows[1].iter().any(|c| c.contains("Rua das Flores")));
    Ok(())
}

#[test]
fn attachment_mirrors_as_flag_only() -> Result<(), Box<dyn std::error::Error>> {
    let mut peer = TestPeer::new()?;
    let mut draft = TestPeer::expense("Farinha", 45.90, "2024-03-10");
    draft.receipt_image = Some(vec![0xFF, 0xD8, 0xFF]);
    let tx = peer.engine.create_transaction(draft)?;

    let rows = peer.tab("Financeiro");
    assert_eq!(rows[1][12], "Com anexo");
    assert!(tx.receipt_image.is_some());
    Ok(())
}

// ============================================================================
// File-backed mirror
// ============================================================================

#[test]
fn engine_runs_over_a_csv_workbook() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let storage = SqliteStorage::open_in_memory()?;
    let sheets = CsvWorkbook::open(WorkbookConfig {
        dir: dir.path().to_path_buf(),
    })?;
    let mut engine = SyncEngine::new(storage, sheets);

    let tx = engine.create_transaction(TestPeer::expense("Farinha", 45.90, "2024-03-10"))?;

    let range = RangeSpec::parse(&Transaction::schema().full_range())?;
    let rows = engine.sheets().read_range(&range)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], tx.id.to_string());
    assert!(dir.path().join("Financeiro.csv").exists());
    Ok(())
}
