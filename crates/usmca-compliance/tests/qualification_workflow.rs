use usmca_compliance::config::QualificationConfig;
use usmca_compliance::workflows::qualification::{
    BusinessType, Component, InvalidInputError, QualificationEvaluator, QualificationLevel,
    QualificationReport, ThresholdSchedule, ThresholdSource,
};

fn evaluator() -> QualificationEvaluator {
    QualificationEvaluator::default()
}

#[test]
fn fully_north_american_textile_qualifies() {
    let components = [
        Component::new("Cotton fabric", "US", 60.0),
        Component::new("Buttons", "MX", 15.0),
        Component::new("Assembly", "CA", 25.0),
    ];

    let result = evaluator()
        .evaluate(&components, "textiles")
        .expect("valid input");

    assert_eq!(result.usmca_content_percentage, 100.0);
    assert_eq!(result.required_threshold, 62.5);
    assert!(result.qualified);
    assert_eq!(result.margin, 37.5);
    assert_eq!(result.qualification_level, QualificationLevel::HighlyQualified);
    assert!(result.warnings.is_empty());
    assert!(!result.low_confidence);
}

#[test]
fn electronics_with_asian_display_fails() {
    let components = [
        Component::new("Display", "TW", 45.0),
        Component::new("Enclosure", "MX", 30.0),
        Component::new("Assembly", "CA", 25.0),
    ];

    let result = evaluator()
        .evaluate(&components, "electronics")
        .expect("valid input");

    assert_eq!(result.usmca_content_percentage, 55.0);
    assert_eq!(result.required_threshold, 65.0);
    assert!(!result.qualified);
    assert_eq!(result.margin, -10.0);
    assert!(!result
        .documentation_required
        .iter()
        .any(|document| document.contains("certification")));
}

#[test]
fn content_equal_to_threshold_qualifies_for_every_business_type() {
    let evaluator = evaluator();
    let schedule = evaluator.schedule();
    assert_eq!(schedule, &ThresholdSchedule::standard(62.5));
    for business_type in BusinessType::ALL {
        let threshold = schedule.threshold_for(business_type);
        let components = [
            Component::new("Domestic content", "US", threshold),
            Component::new("Imported content", "CN", 100.0 - threshold),
        ];

        let result = evaluator
            .evaluate(&components, business_type.label())
            .expect("valid input");
        assert!(result.qualified, "{business_type:?} at {threshold}");
        assert_eq!(result.qualification_level, QualificationLevel::Qualified);
    }
}

#[test]
fn shifting_content_to_north_america_never_hurts() {
    let mut previous: Option<(f64, bool)> = None;
    for step in 0..=20 {
        let usmca = f64::from(step) * 5.0;
        let components = [
            Component::new("Regional", "MX", usmca),
            Component::new("Overseas", "VN", 100.0 - usmca),
        ];

        let result = evaluator()
            .evaluate(&components, "automotive")
            .expect("valid input");

        if let Some((content, qualified)) = previous {
            assert!(result.usmca_content_percentage >= content);
            assert!(!qualified || result.qualified);
        }
        previous = Some((result.usmca_content_percentage, result.qualified));
    }
}

#[test]
fn repeated_evaluation_is_identical() {
    let components = [
        Component::new("Engine block", "US", 41.3),
        Component::new("Transmission", "JP", 22.2),
        Component::new("Wiring", "MX", 36.5),
    ];

    let evaluator = evaluator();
    let first = evaluator.evaluate(&components, "auto").expect("valid input");
    for _ in 0..10 {
        assert_eq!(evaluator.evaluate(&components, "auto").expect("valid input"), first);
    }
}

#[test]
fn configured_overrides_change_the_threshold() {
    let mut thresholds = ThresholdSchedule::standard(62.5);
    thresholds.set(BusinessType::Electronics, 55.0);
    let evaluator = QualificationEvaluator::new(QualificationConfig {
        thresholds,
        sum_tolerance: 0.5,
    });

    let components = [
        Component::new("Display", "TW", 45.0),
        Component::new("Enclosure", "MX", 55.0),
    ];
    let result = evaluator
        .evaluate(&components, "electronics")
        .expect("valid input");
    assert!(result.qualified);
    assert_eq!(result.threshold_source, ThresholdSource::BusinessType);
}

#[test]
fn invalid_components_are_rejected_not_corrected() {
    assert_eq!(
        evaluator().evaluate(&[], "textiles"),
        Err(InvalidInputError::EmptyComponents)
    );
    assert!(matches!(
        evaluator().evaluate(&[Component::new("Frame", "US", 101.0)], "textiles"),
        Err(InvalidInputError::PercentageAboveHundred { index: 0, .. })
    ));
}

#[test]
fn report_lists_sections_for_a_failing_product() {
    let components = [
        Component::new("Display", "TW", 45.0),
        Component::new("Enclosure", "MX", 30.0),
        Component::new("Assembly", "CA", 20.0),
    ];
    let result = evaluator()
        .evaluate(&components, "electronics")
        .expect("valid input");
    let report = QualificationReport::build("Tablet", &result);

    let titles: Vec<&str> = report
        .sections
        .iter()
        .map(|section| section.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Qualification",
            "Component origins",
            "Documentation required",
            "Data quality warnings"
        ]
    );
    assert!(report.render_text().contains("Tablet"));
}
