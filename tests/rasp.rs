use motor_data::rasp::{combine, parse, print};
use motor_data::{Diagnostics, ErrorCode, MotorInfo, Point};

const K550W: &str = include_str!("../data/motors/K550W.eng");

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn parses_minimal_k550w() {
    let data = "K550W 54 410 0 0.919744 1.48736 AT\n0.065 604.264\n3.356 0.000\n";
    let mut diagnostics = Diagnostics::new();
    let motor = parse(data, &mut diagnostics).expect("K550W parses");

    assert!(diagnostics.is_empty(), "unexpected reports: {diagnostics:?}");
    assert!(approx(motor.info.diameter.unwrap(), 0.054));
    assert!(approx(motor.info.length.unwrap(), 0.410));
    assert_eq!(motor.info.name.as_deref(), Some("K550W"));
    assert_eq!(motor.info.manufacturer.as_deref(), Some("AT"));
    assert_eq!(motor.info.delays.as_deref(), Some("0"));
    assert_eq!(motor.points.len(), 2);
    assert_eq!(motor.points[0], Point::new(0.065, 604.264));
}

#[test]
fn weights_are_kept_as_written() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse(K550W, &mut diagnostics).expect("fixture parses");

    // No gram conversion is applied to the RASP weight fields.
    assert_eq!(motor.info.propellant_weight, Some(0.919744));
    assert_eq!(motor.info.total_weight, Some(1.48736));
}

#[test]
fn leading_comments_become_the_motor_comment() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse(K550W, &mut diagnostics).expect("fixture parses");

    assert_eq!(
        motor.info.comment.as_deref(),
        Some("Aerotech K550W White Lightning\n54mm reload, thrust from static test")
    );
    assert_eq!(motor.points.len(), 7);
}

#[test]
fn short_info_line_is_fatal() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse("K550W 54 410 0 0.9 1.4\n0.1 100\n1.0 0\n", &mut diagnostics);

    assert!(motor.is_none());
    assert_eq!(diagnostics.codes(), vec![ErrorCode::RaspInfoLine]);
}

#[test]
fn extra_info_fields_only_warn() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse(
        "K550W 54 410 0 0.9 1.4 AT extra\n0.1 100\n1.0 0\n",
        &mut diagnostics,
    )
    .expect("extra fields are ignored");

    assert_eq!(diagnostics.codes(), vec![ErrorCode::RaspInfoLine]);
    assert_eq!(motor.info.manufacturer.as_deref(), Some("AT"));
}

#[test]
fn undersized_dimensions_are_dropped_with_a_warning() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse("A8 0.5 70 3 0.00000001 0.016 Estes\n0.1 10\n0.7 0\n", &mut diagnostics)
        .expect("info problems are not fatal");

    assert_eq!(motor.info.diameter, None);
    assert!(approx(motor.info.length.unwrap(), 0.070));
    assert_eq!(motor.info.propellant_weight, None);
    assert_eq!(motor.info.total_weight, Some(0.016));
    assert_eq!(
        diagnostics.codes(),
        vec![ErrorCode::InvalidInfo, ErrorCode::InvalidInfo]
    );
}

#[test]
fn bad_points_are_all_reported_before_failing() {
    let data = "K550W 54 410 0 0.9 1.4 AT\n0.1 100\n0.2 abc\n0.3 90 7\n0.4 80\n1.0 0\n";
    let mut diagnostics = Diagnostics::new();
    let motor = parse(data, &mut diagnostics);

    assert!(motor.is_none(), "any bad point fails the parse");
    let invalid = diagnostics
        .iter()
        .filter(|d| d.code == ErrorCode::InvalidPoints)
        .count();
    assert_eq!(invalid, 3, "two bad lines plus the summary: {diagnostics:?}");
    let summary = diagnostics.iter().last().expect("summary report");
    assert!(summary.message.contains("2 invalid"), "{summary}");
}

#[test]
fn negative_values_are_bad_points() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse("X1 10 50 0 0.01 0.02 Y\n-0.1 5\n0.5 0\n", &mut diagnostics);

    assert!(motor.is_none());
    assert!(diagnostics.contains(ErrorCode::InvalidPoints));
}

#[test]
fn second_motor_is_ignored_with_a_warning() {
    let data = format!("{K550W};\n; second motor\nJ350W 38 337 0 0.37 0.7 AT\n0.1 400\n1.5 0\n");
    let mut diagnostics = Diagnostics::new();
    let motor = parse(&data, &mut diagnostics).expect("first motor parses");

    assert_eq!(motor.info.name.as_deref(), Some("K550W"));
    assert_eq!(motor.points.len(), 7);
    assert_eq!(diagnostics.codes(), vec![ErrorCode::MultipleMotors]);
}

#[test]
fn stalled_time_and_open_curve_only_warn() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse("X1 10 50 0 0.01 0.02 Y\n0.1 10\n0.1 20\n0.5 5\n", &mut diagnostics)
        .expect("quality problems are warnings");

    assert_eq!(motor.points.len(), 3);
    assert_eq!(
        diagnostics.codes(),
        vec![ErrorCode::InvalidPoints, ErrorCode::InvalidPoints],
        "stalled time and non-zero final thrust: {diagnostics:?}"
    );
}

#[test]
fn interior_zero_thrust_warns() {
    let mut diagnostics = Diagnostics::new();
    parse("X1 10 50 0 0.01 0.02 Y\n0.1 10\n0.2 0\n0.3 8\n0.5 0\n", &mut diagnostics)
        .expect("interior zero is a warning");

    assert_eq!(diagnostics.codes(), vec![ErrorCode::InvalidPoints]);
}

#[test]
fn single_point_is_missing_points() {
    let mut diagnostics = Diagnostics::new();
    let motor = parse("X1 10 50 0 0.01 0.02 Y\n0.5 0\n", &mut diagnostics);

    assert!(motor.is_none());
    assert!(diagnostics.contains(ErrorCode::MissingPoints));
}

#[test]
fn accepts_carriage_return_line_endings() {
    let unix = parse(K550W, &mut Diagnostics::new()).expect("unix endings");
    let dos = parse(&K550W.replace('\n', "\r\n"), &mut Diagnostics::new()).expect("dos endings");
    let mac = parse(&K550W.replace('\n', "\r"), &mut Diagnostics::new()).expect("mac endings");

    assert_eq!(unix, dos);
    assert_eq!(unix, mac);
}

#[test]
fn print_then_parse_reproduces_the_motor() {
    let original = parse(K550W, &mut Diagnostics::new()).expect("fixture parses");
    let mut diagnostics = Diagnostics::new();
    let text = print(&original.info, &original.points, &mut diagnostics).expect("prints");
    let reparsed = parse(&text, &mut diagnostics).expect("printed text parses");

    assert!(diagnostics.is_empty(), "unexpected reports: {diagnostics:?}");
    assert_eq!(reparsed.points.len(), original.points.len());
    for (a, b) in original.points.iter().zip(&reparsed.points) {
        assert!(approx(a.time, b.time) && approx(a.thrust, b.thrust), "{a:?} vs {b:?}");
    }
    assert_eq!(reparsed.info.name, original.info.name);
    assert_eq!(reparsed.info.manufacturer, original.info.manufacturer);
    assert_eq!(reparsed.info.delays, original.info.delays);
    assert_eq!(reparsed.info.comment, original.info.comment);
    assert_eq!(reparsed.info.propellant_weight, original.info.propellant_weight);
    assert_eq!(reparsed.info.total_weight, original.info.total_weight);
    assert!(approx(reparsed.info.diameter.unwrap(), original.info.diameter.unwrap()));
    assert!(approx(reparsed.info.length.unwrap(), original.info.length.unwrap()));
}

#[test]
fn print_normalizes_tokens() {
    let info = MotorInfo {
        name: Some("My Motor".to_string()),
        diameter: Some(0.029),
        length: Some(0.124),
        delays: Some("6,10, 14".to_string()),
        propellant_weight: Some(0.0625),
        ..MotorInfo::default()
    };
    let points = [Point::new(0.1, 20.0), Point::new(1.25, 0.0)];
    let text = print(&info, &points, &mut Diagnostics::new()).expect("prints");

    assert_eq!(
        text,
        "My_Motor 29 124 6-10-14 0.0625 0 Unknown\n   0.100 20.000\n   1.250 0.000\n"
    );
}

#[test]
fn print_keeps_sub_millisecond_times_apart() {
    let points = [
        Point::new(0.0125, 10.0),
        Point::new(0.013, 12.0),
        Point::new(0.5, 0.0),
    ];
    let info = parse(K550W, &mut Diagnostics::new()).expect("fixture parses").info;
    let mut diagnostics = Diagnostics::new();
    let text = print(&info, &points, &mut diagnostics).expect("prints");

    assert!(
        text.ends_with("   0.0125 10.000\n   0.013 12.000\n   0.500 0.000\n"),
        "{text}"
    );
    let reparsed = parse(&text, &mut diagnostics).expect("printed text parses");
    assert!(diagnostics.is_empty(), "unexpected reports: {diagnostics:?}");
    assert_eq!(reparsed.points.len(), 3);
}

#[test]
fn print_needs_two_points() {
    let mut diagnostics = Diagnostics::new();
    let text = print(&MotorInfo::default(), &[Point::new(1.0, 0.0)], &mut diagnostics);

    assert!(text.is_none());
    assert_eq!(diagnostics.codes(), vec![ErrorCode::MissingPoints]);
}

#[test]
fn combine_joins_bodies_with_a_separator() {
    let payloads = [
        "\r\nK1 29 100 0 0.05 0.1 AT\r\n0.1 10\r\n0.5 0\r\n\r\n",
        "K2 29 100 0 0.05 0.1 CTI\n0.2 20\n0.6 0\n",
    ];
    let combined = combine(&payloads, &mut Diagnostics::new()).expect("combines");

    assert_eq!(
        combined,
        "K1 29 100 0 0.05 0.1 AT\n0.1 10\n0.5 0\n;\nK2 29 100 0 0.05 0.1 CTI\n0.2 20\n0.6 0\n"
    );

    let mut diagnostics = Diagnostics::new();
    let first = parse(&combined, &mut diagnostics).expect("combined text parses");
    assert_eq!(first.info.name.as_deref(), Some("K1"));
    assert_eq!(diagnostics.codes(), vec![ErrorCode::MultipleMotors]);
}

#[test]
fn combine_of_blank_payloads_is_empty() {
    let mut diagnostics = Diagnostics::new();
    let combined = combine(&["", "  \n\n"], &mut diagnostics);

    assert!(combined.is_none());
    assert_eq!(diagnostics.codes(), vec![ErrorCode::DataFileEmpty]);
}
