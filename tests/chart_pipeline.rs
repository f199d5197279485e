//! End-to-end chart builds through the public API.

use u_spc::spc::{
    build_chart, chart_factors, classify, detect, ChartKind, ChartOptions, ClassificationDecision,
    ExceptionKind, RuleSet, Sample, SeriesTag,
};
use u_spc::SpcError;

const SCENARIO: [f64; 12] = [
    10.0, 12.0, 9.0, 11.0, 13.0, 10.0, 12.0, 11.0, 9.0, 14.0, 10.0, 12.0,
];

fn forced_options(json_extra: &str) -> ChartOptions {
    let json = format!(r#"{{ "chartType": "xBarR", "groupSize": 3 {json_extra} }}"#);
    ChartOptions::from_json(&json).expect("valid options")
}

#[test]
fn scenario_xbar_r_from_json_options() {
    let sample = Sample::new(SCENARIO.to_vec()).unwrap();
    let model = build_chart(&sample, &forced_options("")).unwrap();

    assert_eq!(model.kind, ChartKind::XBarR);
    assert_eq!(model.means.n, 4);
    assert_eq!(model.ranges.n, 4);

    let f = chart_factors(3).unwrap();
    let x_cl = model.means.values.iter().sum::<f64>() / 4.0;
    let r_cl = model.ranges.values.iter().sum::<f64>() / 4.0;
    assert!((model.means.center_line - x_cl).abs() < 1e-12);
    assert!((model.ranges.center_line - r_cl).abs() < 1e-12);

    for i in 0..4 {
        assert!((model.means.upper_limits[i] - (x_cl + f.a2 * r_cl)).abs() < 1e-12);
        assert!((model.means.lower_limits[i] - (x_cl - f.a2 * r_cl)).abs() < 1e-12);
        assert!((model.ranges.upper_limits[i] - f.d4 * r_cl).abs() < 1e-12);
        assert!((model.ranges.lower_limits[i] - f.d3 * r_cl).abs() < 1e-12);
    }
}

#[test]
fn overrides_from_json_replace_limits() {
    let sample = Sample::new(SCENARIO.to_vec()).unwrap();
    let model = build_chart(&sample, &forced_options(r#", "xUCL": 11.0, "rCL": 1.0"#)).unwrap();
    assert_eq!(model.means.upper_limits, vec![11.0; 4]);
    assert_eq!(model.ranges.center_line, 1.0);
    assert!((model.ranges.upper_limits[0] - 2.58).abs() < 1e-12);
    // Means 11.33 and 12.0 now exceed the upper limit
    let out: Vec<usize> = model
        .means
        .exceptions
        .iter()
        .filter(|e| e.kind == ExceptionKind::OutOfLimits)
        .map(|e| e.index)
        .collect();
    assert_eq!(out, vec![1, 3]);
}

#[test]
fn unsupported_group_size_is_reported() {
    let sample = Sample::new(SCENARIO.to_vec()).unwrap();
    let opts = ChartOptions::from_json(r#"{ "chartType": "xBarR", "groupSize": 6 }"#).unwrap();
    let err = build_chart(&sample, &opts).unwrap_err();
    assert_eq!(err, SpcError::UnsupportedSubgroupSize(6));
    assert_eq!(err.to_string(), "unsupported subgroup size: 6");
}

#[test]
fn forced_chart_errors() {
    let sample = Sample::new(SCENARIO.to_vec()).unwrap();
    let missing = ChartOptions::from_json(r#"{ "chartType": "xBarR" }"#).unwrap();
    assert_eq!(
        build_chart(&sample, &missing),
        Err(SpcError::MissingGroupSize)
    );

    let unknown = ChartOptions::from_json(r#"{ "chart": "cusum", "groupSize": 3 }"#).unwrap();
    assert_eq!(
        build_chart(&sample, &unknown),
        Err(SpcError::UnknownChartType("cusum".into()))
    );
}

#[test]
fn rebuild_is_bit_identical() {
    let sample = Sample::new(SCENARIO.to_vec()).unwrap();
    let opts = forced_options("");
    let first = build_chart(&sample, &opts).unwrap();
    let second = build_chart(&sample, &opts).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn model_serializes_for_rendering() {
    let entries = SCENARIO.iter().enumerate().map(|(i, &v)| (format!("t{i}"), v));
    let sample = Sample::keyed(entries).unwrap();
    let model = build_chart(&sample, &forced_options("")).unwrap();
    let json = serde_json::to_value(&model).unwrap();

    assert_eq!(json["kind"], "xBarR");
    assert_eq!(json["groupSize"], 3);
    assert_eq!(json["keys"][0], "t0");
    assert_eq!(json["means"]["chartType"], "xBar");
    assert_eq!(json["ranges"]["chartType"], "R");
    assert_eq!(json["means"]["n"], 4);
    assert_eq!(json["means"]["upperLimits"].as_array().unwrap().len(), 4);

    // 4 points always fall inside the rule 3 lower band
    let last = &json["means"]["exceptions"].as_array().unwrap()[0];
    assert_eq!(last["index"], 3);
    assert_eq!(last["rule"], "tooFewRuns");
    assert!(last["reason"].as_str().unwrap().contains("too low"));
}

#[test]
fn rule_set_from_json_disables_rules() {
    let sample = Sample::new(SCENARIO.to_vec()).unwrap();
    let opts = forced_options(
        r#", "rules": {
            "outOfLimits": false,
            "runOnOneSide": false,
            "runCount": false,
            "trend": false
        }"#,
    );
    assert_eq!(opts.rules, RuleSet::NONE);
    let model = build_chart(&sample, &opts).unwrap();
    assert!(model.is_in_control());
    assert!(model.exceptions().is_empty());
}

#[test]
fn shifted_process_flags_run_and_limits() {
    // 10 stable subgroups, then 8 subgroups shifted up by a small amount
    let mut data = Vec::new();
    for i in 0..10 {
        let d = (i % 3) as f64 * 0.1;
        data.extend([10.0 + d, 10.4 - d, 9.8 + d]);
    }
    for i in 0..8 {
        let d = (i % 3) as f64 * 0.1;
        data.extend([10.6 + d, 11.0 - d, 10.4 + d]);
    }
    let sample = Sample::new(data).unwrap();
    let model = build_chart(&sample, &forced_options("")).unwrap();

    let runs: Vec<usize> = model
        .means
        .exceptions
        .iter()
        .filter(|e| e.kind == ExceptionKind::RunOnOneSide)
        .map(|e| e.index)
        .collect();
    assert_eq!(runs, vec![7, 17]);
    assert!(!model.is_in_control());
    assert!(model
        .exceptions()
        .iter()
        .all(|(tag, _)| matches!(tag, SeriesTag::XBar | SeriesTag::R)));
}

#[test]
fn detector_properties_on_raw_series() {
    // Alternating points beyond both limits: rule 1 flags exactly those
    let values = [20.0, 0.0, 20.0, 0.0, 20.0, 0.0, 20.0, 0.0];
    let ucl = [15.0; 8];
    let lcl = [5.0; 8];
    let only_limits = RuleSet {
        out_of_limits: true,
        ..RuleSet::NONE
    };
    let found = detect(&values, 10.0, &ucl, &lcl, only_limits);
    let flagged: Vec<usize> = found.iter().map(|e| e.index).collect();
    assert_eq!(flagged, (0..8).collect::<Vec<_>>());

    // Strict increase of length 7: trend at index 5 only
    let rising = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    let only_trend = RuleSet {
        trend: true,
        ..RuleSet::NONE
    };
    let found = detect(&rising, 4.0, &[100.0; 7], &[-100.0; 7], only_trend);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].index, 5);
    assert_eq!(found[0].kind, ExceptionKind::TrendUp);
}

#[test]
fn classification_of_attribute_data_is_routing_only() {
    let opts = ChartOptions::from_json(
        r#"{ "isCountData": true, "isDefectCount": false, "isConstantOpportunity": false }"#,
    )
    .unwrap();
    assert_eq!(
        classify(&[3.0, 5.0, 4.0], &opts),
        Ok(ClassificationDecision::P)
    );
    let sample = Sample::new(vec![3.0, 5.0, 4.0]).unwrap();
    assert_eq!(
        build_chart(&sample, &opts),
        Err(SpcError::NotComputed(ChartKind::P))
    );
}
