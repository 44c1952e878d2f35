use expert_panel::{
    analyze, CaseDefinition, ClientRecord, ExpertError, ExpertRegistry, Report, TrainingTable,
};
use std::sync::Arc;
use std::thread;

fn cases_table() -> TrainingTable {
    TrainingTable::from_records(vec![
        vec![("HORARIO", "MANHA"), ("SEXO", "F"), ("PRODUTO", "SIM"), ("BEBIDA", "CAFE")],
        vec![("HORARIO", "TARDE"), ("SEXO", "M"), ("PRODUTO", "NAO"), ("BEBIDA", "CAFE")],
        vec![("HORARIO", "TARDE"), ("SEXO", "F"), ("PRODUTO", "SIM"), ("BEBIDA", "CAFE")],
    ])
    .expect("valid table")
}

#[test]
fn test_registry_robustness() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ExpertRegistry::builder()
        .add_case(CaseDefinition::new("Case A", "PRODUTO"), cases_table())?
        .add_case(CaseDefinition::new("Case B", "BEBIDA"), cases_table())?
        .build();

    assert_eq!(registry.case_ids().collect::<Vec<_>>(), vec!["Case A"]);
    assert!(matches!(registry.failures().get("Case B"), Some(ExpertError::Training(_))));

    let record = ClientRecord::new().with_value("HORARIO", "MANHA").with_value("SEXO", "F");
    let report = analyze(&record, &registry);
    assert_eq!(report.len(), 1);
    assert_eq!(report.get("Analise_Case_A"), Some("SIM"));
    assert_eq!(report.get("Analise_Case_B"), None);
    Ok(())
}

#[test]
fn test_empty_registry_scenario() {
    let record = ClientRecord::new().with_value("HORARIO", "MANHA");
    let report = analyze(&record, &ExpertRegistry::empty());
    assert_eq!(report, Report::default());
    assert!(report.is_empty());
}

#[test]
fn test_data_source_failure_leaves_other_cases() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ExpertRegistry::builder()
        .add_unavailable_case(
            CaseDefinition::new("Case 2", "BEBIDA"),
            ExpertError::DataSource("connection refused".into()),
        )?
        .add_case(CaseDefinition::new("Case 1", "PRODUTO"), cases_table())?
        .build();

    assert_eq!(registry.len(), 1);
    assert!(registry.get("Case 2").is_none());
    assert_eq!(registry.failures().len(), 1);

    let record = ClientRecord::new().with_value("HORARIO", "TARDE").with_value("SEXO", "M");
    let report = analyze(&record, &registry);
    assert_eq!(report.iter().collect::<Vec<_>>(), vec![("Analise_Case_1", "NAO")]);
    Ok(())
}

#[test]
fn test_multiple_experts_on_one_table() -> Result<(), Box<dyn std::error::Error>> {
    let table = TrainingTable::from_records(vec![
        vec![("HORARIO", "MANHA"), ("PRODUTO", "SIM"), ("BEBIDA", "CAFE")],
        vec![("HORARIO", "TARDE"), ("PRODUTO", "NAO"), ("BEBIDA", "CHA")],
    ])?;
    let registry = ExpertRegistry::builder()
        .add_case(CaseDefinition::new("Case 1", "PRODUTO"), table.clone())?
        .add_case(CaseDefinition::new("Case 2", "BEBIDA"), table)?
        .build();

    let record = ClientRecord::new()
        .with_value("HORARIO", "TARDE")
        .with_value("PRODUTO", "NAO")
        .with_value("BEBIDA", "CHA");
    let report = analyze(&record, &registry);
    assert_eq!(report.get("Analise_Case_1"), Some("NAO"));
    assert_eq!(report.get("Analise_Case_2"), Some("CHA"));
    Ok(())
}

#[test]
fn test_shared_registry_across_threads() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(
        ExpertRegistry::builder()
            .add_case(CaseDefinition::new("Case 1", "PRODUTO"), cases_table())?
            .build(),
    );
    let record = ClientRecord::new().with_value("HORARIO", "TARDE").with_value("SEXO", "F");
    let expected = analyze(&record, &registry);

    let mut handles = vec![];
    for _ in 0..4 {
        let registry = Arc::clone(&registry);
        let record = record.clone();
        handles.push(thread::spawn(move || analyze(&record, &registry)));
    }

    for handle in handles {
        assert_eq!(handle.join().expect("analysis thread panicked"), expected);
    }
    Ok(())
}
