use std::io::Write;
use std::path::Path;

use conversion_by_channel::aggregate::ChannelAggregator;
use conversion_by_channel::intake::read_observations;
use conversion_by_channel::models::ConversionBounds;
use conversion_by_channel::report::build_report;

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn run_pipeline(path: &Path, bounds: ConversionBounds) -> String {
    let observations = read_observations(path).unwrap();
    let mut aggregator = ChannelAggregator::new();
    for obs in observations {
        aggregator.ingest(obs);
    }
    build_report(&aggregator.finalize(), &bounds)
}

const HEADER: &str = "week,site,visitcountry,entrypage,subtype,device,visits,signups,dna\n";

#[test]
fn two_week_scenario_produces_expected_line() {
    let file = write_csv(&format!(
        "{HEADER}\
         01/01/2020,S,US,home,a,mobile,100,10,5\n\
         01/08/2020,S,US,home,a,mobile,100,20,5\n"
    ));
    let report = run_pipeline(file.path(), ConversionBounds::default());

    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 1);
    let fields: Vec<&str> = lines[0].split(',').collect();
    assert_eq!(&fields[..5], &["S", "US", "home", "a", "mobile"]);
    assert_eq!(&fields[5..8], &["200", "30", "10"]);
    assert_eq!(fields[8], "0.15000");
    assert_eq!(fields[9], "0.05000");
    // The cumulative signup ratio rose from 0.10 to 0.15, so the fitted
    // slope is positive even though it prints as 0.00000 at epoch scale.
    let slope: f64 = fields[10].parse().unwrap();
    assert!(slope >= 0.0);
}

#[test]
fn conservation_of_totals_across_keys() {
    let file = write_csv(&format!(
        "{HEADER}\
         01/01/2020,S,US,home,a,mobile,100,10,5\n\
         01/01/2020,S,US,home,a,desktop,40,4,2\n\
         01/08/2020,T,DE,landing,b,mobile,60,6,3\n\
         01/08/2020,S,US,home,a,mobile,100,20,5\n"
    ));
    let observations = read_observations(file.path()).unwrap();
    let input_visits: u64 = observations.iter().map(|o| o.visits).sum();
    let input_signups: u64 = observations.iter().map(|o| o.signups).sum();
    let input_dna: u64 = observations.iter().map(|o| o.dna).sum();

    let mut aggregator = ChannelAggregator::new();
    for obs in observations {
        aggregator.ingest(obs);
    }
    let summaries = aggregator.finalize();

    assert_eq!(summaries.iter().map(|s| s.total_visits).sum::<u64>(), input_visits);
    assert_eq!(summaries.iter().map(|s| s.total_signups).sum::<u64>(), input_signups);
    assert_eq!(summaries.iter().map(|s| s.total_dna).sum::<u64>(), input_dna);
}

#[test]
fn rerun_on_same_input_is_byte_identical() {
    let file = write_csv(&format!(
        "{HEADER}\
         01/01/2020,S,US,home,a,mobile,100,10,5\n\
         01/01/2020,T,DE,landing,b,desktop,80,8,4\n\
         01/08/2020,S,US,home,a,mobile,100,20,5\n\
         01/15/2020,T,DE,landing,b,desktop,90,18,6\n"
    ));
    let first = run_pipeline(file.path(), ConversionBounds::default());
    let second = run_pipeline(file.path(), ConversionBounds::default());
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn zero_visit_key_never_appears() {
    let file = write_csv(&format!(
        "{HEADER}\
         01/01/2020,dead,US,home,a,mobile,0,0,0\n\
         01/08/2020,dead,US,home,a,mobile,0,0,0\n\
         01/01/2020,live,US,home,a,mobile,100,10,5\n"
    ));
    let report = run_pipeline(file.path(), ConversionBounds::default());
    assert_eq!(report.lines().count(), 1);
    assert!(report.starts_with("live,"));
}

#[test]
fn fully_converting_key_is_excluded_by_default_bounds() {
    let file = write_csv(&format!(
        "{HEADER}\
         01/01/2020,sat,US,home,a,mobile,50,50,0\n\
         01/01/2020,live,US,home,a,mobile,100,10,5\n"
    ));
    let report = run_pipeline(file.path(), ConversionBounds::default());
    assert_eq!(report.lines().count(), 1);
    assert!(report.starts_with("live,"));

    // The same key passes once the bounds are widened.
    let widened = run_pipeline(file.path(), ConversionBounds { min: -1.0, max: 2.0 });
    assert_eq!(widened.lines().count(), 2);
}

#[test]
fn single_row_key_gets_flat_trend() {
    let file = write_csv(&format!("{HEADER}01/01/2020,S,US,home,a,mobile,100,25,10\n"));
    let report = run_pipeline(file.path(), ConversionBounds::default());

    let line = report.lines().next().unwrap();
    let fields: Vec<&str> = line.split(',').collect();
    // slope 0, intercept = the single cumulative ratio
    assert_eq!(fields[10], "0.00000");
    assert_eq!(fields[11], "0.25000");
    assert_eq!(fields[12], "0.00000");
    assert_eq!(fields[13], "0.10000");
}

#[test]
fn malformed_row_fails_the_run() {
    let file = write_csv(&format!(
        "{HEADER}\
         01/01/2020,S,US,home,a,mobile,100,10,5\n\
         not-a-date,S,US,home,a,mobile,100,10,5\n"
    ));
    let err = read_observations(file.path()).unwrap_err();
    assert!(err.to_string().contains("line 3"));
}
