use motor_data::rocksim::{combine, parse, print};
use motor_data::{Diagnostics, ErrorCode, MotorInfo, MotorType, Point};

const K550W: &str = include_str!("../data/motors/K550W.rse");

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn parses_bare_engine() {
    let data = r#"<engine code="K550W" mfg="Aerotech" dia="54." len="410."><data><eng-data t="0." f="628.15" m="880.4"/><eng-data t="3.5" f="0." m="0."/></data></engine>"#;
    let mut diagnostics = Diagnostics::new();
    let motor = parse(data, &mut diagnostics).expect("bare engine parses");

    assert!(diagnostics.is_empty(), "unexpected reports: {diagnostics:?}");
    assert!(approx(motor.info.diameter.unwrap(), 0.054));
    assert!(approx(motor.info.length.unwrap(), 0.410));
    assert_eq!(motor.points.len(), 2);
    let first = motor.points[0].propellant_weight.expect("first point mass");
    assert!(approx(first, 0.8804), "880.4 g should be 0.8804 kg, got {first}");
    assert_eq!(motor.points[1].propellant_weight, Some(0.0));
}

#[test]
fn parses_engine_database() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse(K550W, &mut diagnostics).expect("fixture parses");

    assert!(diagnostics.is_empty(), "unexpected reports: {diagnostics:?}");
    let info = &motor.info;
    assert_eq!(info.name.as_deref(), Some("K550W"));
    assert_eq!(info.manufacturer.as_deref(), Some("Aerotech"));
    assert_eq!(info.motor_type, Some(MotorType::Reload));
    assert_eq!(info.delays.as_deref(), Some("6,10,14"));
    assert!(approx(info.total_weight.unwrap(), 1.48736));
    assert!(approx(info.propellant_weight.unwrap(), 0.919744));
    assert_eq!(info.total_impulse, Some(1595.0));
    assert_eq!(info.burn_time, Some(3.5));
    assert_eq!(info.comment.as_deref(), Some("Aerotech K550W White Lightning"));
    assert_eq!(motor.points.len(), 4);
}

#[test]
fn cdata_comments_are_read_as_text() {
    let data = r#"<engine code="X1"><comments><![CDATA[thrust < 5 N & short]]></comments><data><eng-data t="0.1" f="4"/><eng-data t="0.9" f="0"/></data></engine>"#;
    let motor = parse(data, &mut Diagnostics::new()).expect("parses");

    assert_eq!(motor.info.comment.as_deref(), Some("thrust < 5 N & short"));
}

#[test]
fn one_bad_point_aborts_the_parse() {
    let data = r#"<engine code="X1"><data><eng-data t="0.1" f="4"/><eng-data t="oops" f="3"/><eng-data t="0.9" f="0"/></data></engine>"#;
    let mut diagnostics = Diagnostics::new();
    let motor = parse(data, &mut diagnostics);

    assert!(motor.is_none(), "RockSim stops at the first bad point");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::InvalidPoints]);
}

#[test]
fn bad_mass_is_dropped_with_a_warning() {
    let data = r#"<engine code="X1"><data><eng-data t="0.1" f="4" m="-2"/><eng-data t="0.9" f="0" m="0"/></data></engine>"#;
    let mut diagnostics = Diagnostics::new();
    let motor = parse(data, &mut diagnostics).expect("mass problems are warnings");

    assert_eq!(motor.points[0].propellant_weight, None);
    assert_eq!(motor.points[1].propellant_weight, Some(0.0));
    assert_eq!(diagnostics.codes(), vec![ErrorCode::InvalidPoints]);
}

#[test]
fn malformed_xml_is_reported() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse(r#"<engine code="X1"><data>"#, &mut diagnostics);

    assert!(motor.is_none());
    assert_eq!(diagnostics.codes(), vec![ErrorCode::RocksimBadXml]);
}

#[test]
fn unexpected_root_is_wrong_document() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse("<motor><data/></motor>", &mut diagnostics);

    assert!(motor.is_none());
    assert_eq!(diagnostics.codes(), vec![ErrorCode::RocksimWrongDoc]);
}

#[test]
fn extra_engines_warn_and_the_first_wins() {
    let data = r#"<engine-database><engine-list>
        <engine code="A"><data><eng-data t="0.1" f="4"/><eng-data t="0.9" f="0"/></data></engine>
        <engine code="B"><data><eng-data t="0.1" f="8"/><eng-data t="0.9" f="0"/></data></engine>
    </engine-list></engine-database>"#;
    let mut diagnostics = Diagnostics::new();
    let motor = parse(data, &mut diagnostics).expect("first engine parses");

    assert_eq!(motor.info.name.as_deref(), Some("A"));
    assert_eq!(diagnostics.codes(), vec![ErrorCode::MultipleMotors]);
}

#[test]
fn extra_data_blocks_warn_and_the_first_wins() {
    let data = r#"<engine code="X1">
        <data><eng-data t="0.1" f="4"/><eng-data t="0.9" f="0"/></data>
        <data><eng-data t="0.2" f="9"/><eng-data t="2.0" f="0"/></data>
    </engine>"#;
    let mut diagnostics = Diagnostics::new();
    let motor = parse(data, &mut diagnostics).expect("first block parses");

    assert_eq!(motor.points, vec![Point::new(0.1, 4.0), Point::new(0.9, 0.0)]);
    assert_eq!(diagnostics.codes(), vec![ErrorCode::MultipleMotors]);
}

#[test]
fn stalled_time_only_warns() {
    let data = r#"<engine code="X1"><data><eng-data t="0.1" f="4"/><eng-data t="0.10004" f="5"/><eng-data t="0.9" f="0"/></data></engine>"#;
    let mut diagnostics = Diagnostics::new();
    let motor = parse(data, &mut diagnostics).expect("stalled time is a warning");

    assert_eq!(motor.points.len(), 3, "the stalled point is kept");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::InvalidPoints]);
}

#[test]
fn missing_data_is_fatal() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse(r#"<engine code="X1"/>"#, &mut diagnostics);

    assert!(motor.is_none());
    assert_eq!(diagnostics.codes(), vec![ErrorCode::MissingPoints]);
}

#[test]
fn motor_type_labels_are_normalized() {
    let with_type = |label: &str| {
        format!(
            r#"<engine code="X1" Type="{label}"><data><eng-data t="0.1" f="4"/><eng-data t="0.9" f="0"/></data></engine>"#
        )
    };

    let su = parse(&with_type("Single-Use"), &mut Diagnostics::new()).expect("parses");
    assert_eq!(su.info.motor_type, Some(MotorType::SingleUse));
    let hybrid = parse(&with_type("HYBRID"), &mut Diagnostics::new()).expect("parses");
    assert_eq!(hybrid.info.motor_type, Some(MotorType::Hybrid));

    let mut diagnostics = Diagnostics::new();
    let unknown = parse(&with_type("solid"), &mut diagnostics).expect("type is not blocking");
    assert_eq!(unknown.info.motor_type, None);
    assert_eq!(diagnostics.codes(), vec![ErrorCode::InvalidInfo]);
}

#[test]
fn attribute_thresholds_drop_fields() {
    let data = r#"<engine code="X1" propWt="0.05" initWt="0.5" Isp="180"><data><eng-data t="0.1" f="4"/><eng-data t="0.9" f="0"/></data></engine>"#;
    let mut diagnostics = Diagnostics::new();
    let motor = parse(data, &mut diagnostics).expect("info problems are warnings");

    assert_eq!(motor.info.propellant_weight, None);
    assert_eq!(motor.info.total_weight, None);
    assert_eq!(motor.info.isp, Some(180.0));
    assert_eq!(
        diagnostics.codes(),
        vec![ErrorCode::InvalidInfo, ErrorCode::InvalidInfo]
    );
}

#[test]
fn print_then_parse_reproduces_the_motor() {
    let original = parse(K550W, &mut Diagnostics::new()).expect("fixture parses");
    let mut diagnostics = Diagnostics::new();
    let xml = print(&original.info, &original.points, &mut diagnostics).expect("prints");
    assert!(
        xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#),
        "declaration first: {xml}"
    );

    let reparsed = parse(&xml, &mut diagnostics).expect("printed XML parses");
    assert!(diagnostics.is_empty(), "unexpected reports: {diagnostics:?}");
    assert_eq!(reparsed.points.len(), original.points.len());
    for (a, b) in original.points.iter().zip(&reparsed.points) {
        assert!(approx(a.time, b.time) && approx(a.thrust, b.thrust), "{a:?} vs {b:?}");
        assert!(approx(
            a.propellant_weight.unwrap(),
            b.propellant_weight.unwrap()
        ));
    }

    let (a, b) = (&original.info, &reparsed.info);
    assert_eq!(a.name, b.name);
    assert_eq!(a.manufacturer, b.manufacturer);
    assert_eq!(a.motor_type, b.motor_type);
    assert_eq!(a.delays, b.delays);
    assert_eq!(a.comment, b.comment);
    assert_eq!(a.total_impulse, b.total_impulse);
    assert_eq!(a.max_thrust, b.max_thrust);
    for (x, y) in [
        (a.diameter, b.diameter),
        (a.length, b.length),
        (a.total_weight, b.total_weight),
        (a.propellant_weight, b.propellant_weight),
    ] {
        assert!(approx(x.unwrap(), y.unwrap()), "{x:?} vs {y:?}");
    }
}

#[test]
fn print_synthesizes_point_masses_from_impulse() {
    let info = MotorInfo {
        name: Some("X1".to_string()),
        propellant_weight: Some(0.1),
        ..MotorInfo::default()
    };
    let points = [Point::new(1.0, 10.0), Point::new(2.0, 0.0)];
    let xml = print(&info, &points, &mut Diagnostics::new()).expect("prints");
    let motor = parse(&xml, &mut Diagnostics::new()).expect("printed XML parses");

    let masses: Vec<f64> = motor
        .points
        .iter()
        .map(|p| p.propellant_weight.expect("synthesized mass"))
        .collect();
    assert!(approx(masses[0], 0.05), "half the impulse is burned at t=1: {masses:?}");
    assert!(approx(masses[1], 0.0));
}

#[test]
fn combine_rewraps_engine_lists() {
    let bare = r#"<engine code="Z"><data><eng-data t="0.1" f="4"/><eng-data t="0.9" f="0"/></data></engine>"#;
    let other = MotorInfo {
        name: Some("J350W".to_string()),
        ..MotorInfo::default()
    };
    let printed = print(
        &other,
        &[Point::new(0.1, 400.0), Point::new(1.5, 0.0)],
        &mut Diagnostics::new(),
    )
    .expect("prints");

    let mut diagnostics = Diagnostics::new();
    let combined = combine(&[K550W, bare, printed.as_str()], &mut diagnostics).expect("combines");

    assert!(diagnostics.is_empty(), "skipped payloads are not reported");
    assert!(combined.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert_eq!(combined.matches("<engine ").count(), 2, "{combined}");
    assert!(!combined.contains(r#"code="Z""#), "bare engines are skipped");

    let mut diagnostics = Diagnostics::new();
    let first = parse(&combined, &mut diagnostics).expect("combined XML parses");
    assert_eq!(first.info.name.as_deref(), Some("K550W"));
    assert_eq!(diagnostics.codes(), vec![ErrorCode::MultipleMotors]);
}

#[test]
fn combine_without_databases_is_empty() {
    let mut diagnostics = Diagnostics::new();
    let combined = combine(&[r#"<engine code="Z"/>"#], &mut diagnostics);

    assert!(combined.is_none());
    assert_eq!(diagnostics.codes(), vec![ErrorCode::DataFileEmpty]);
}
