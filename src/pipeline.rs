use crate::data::table::{FeatureMatrix, PredictionTable, UploadedTable};
use crate::error::{Notice, PipelineError};
use crate::model::{Classifier, ModelHandle};

/// Tolerance for a probability row summing to one.
pub const SUM_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Upload columns matched against a classifier's feature schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Classifier input: schema order when a schema exists, file order otherwise.
    pub input: FeatureMatrix,
    /// Schema features the upload lacks, in schema order.
    pub missing: Vec<String>,
    /// Upload columns the schema does not name, in file order.
    pub extra: Vec<String>,
}

impl Reconciliation {
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if !self.missing.is_empty() {
            notices.push(Notice::MissingColumns(self.missing.clone()));
        }
        if !self.extra.is_empty() {
            notices.push(Notice::ExtraColumns(self.extra.clone()));
        }
        notices
    }
}

/// Match `table` to `schema`.
///
/// With a schema the input is the upload projected onto the schema features
/// that are present, in schema order. Without one every column is passed
/// through positionally.
pub fn reconcile(table: &UploadedTable, schema: Option<&[String]>) -> Reconciliation {
    let Some(schema) = schema else {
        return Reconciliation {
            input: table.positional(),
            missing: Vec::new(),
            extra: Vec::new(),
        };
    };

    let mut present = Vec::with_capacity(schema.len());
    let mut missing = Vec::new();
    for feature in schema {
        match table.column_index(feature) {
            Some(idx) => present.push(idx),
            None => missing.push(feature.clone()),
        }
    }
    let extra = table
        .columns
        .iter()
        .filter(|c| !schema.contains(*c))
        .cloned()
        .collect();

    Reconciliation {
        input: table.select(&present),
        missing,
        extra,
    }
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

/// Everything one invocation produced: notices in the order they arose, and
/// either the full prediction table or the fatal error.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub notices: Vec<Notice>,
    pub outcome: Result<PredictionTable, PipelineError>,
}

/// Run reconciliation and prediction for one upload.
///
/// An unavailable model aborts before reconciliation. Missing columns only
/// warn; prediction is still attempted and may then fail on its own.
pub fn run(table: &UploadedTable, model: &ModelHandle) -> PipelineReport {
    let classifier = match model.classifier() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return PipelineReport {
                notices: Vec::new(),
                outcome: Err(e),
            };
        }
    };

    let reconciliation = reconcile(table, classifier.feature_names());
    let notices = reconciliation.notices();
    for notice in &notices {
        if notice.is_warning() {
            log::warn!("{notice}");
        } else {
            log::info!("{notice}");
        }
    }

    let outcome = predict(classifier, &reconciliation.input, table.len());
    match &outcome {
        Ok(p) => log::info!("Predicted {} rows", p.len()),
        Err(e) => log::error!("{e}"),
    }
    PipelineReport { notices, outcome }
}

/// Invoke the classifier and shape its output as a [`PredictionTable`].
fn predict(
    classifier: &dyn Classifier,
    input: &FeatureMatrix,
    expected_rows: usize,
) -> Result<PredictionTable, PipelineError> {
    let raw = classifier
        .predict_proba(input)
        .map_err(|e| PipelineError::Prediction(format!("{e:#}")))?;

    if raw.len() != expected_rows {
        return Err(PipelineError::Prediction(format!(
            "classifier returned {} rows for {expected_rows} input rows",
            raw.len()
        )));
    }

    let mut rows = Vec::with_capacity(raw.len());
    for (row_no, row) in raw.into_iter().enumerate() {
        let probs: [f64; 3] = row.as_slice().try_into().map_err(|_| {
            PipelineError::Prediction(format!(
                "classifier returned {} probabilities in row {row_no}, expected 3",
                row.len()
            ))
        })?;
        let sum: f64 = probs.iter().sum();
        if probs.iter().any(|&p| !(p >= 0.0)) || (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(PipelineError::Prediction(format!(
                "row {row_no} is not a probability distribution: {probs:?}"
            )));
        }
        rows.push(probs);
    }
    Ok(PredictionTable { rows })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use anyhow::{Result, bail};

    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::table::CLASS_COLUMNS;
    use crate::model::SoftmaxRegression;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn iris_model(named: bool) -> ModelHandle {
        let model = SoftmaxRegression {
            classes: names(&["setosa", "versicolor", "virginica"]),
            feature_names: named.then(|| {
                names(&["sepal_length", "sepal_width", "petal_length", "petal_width"])
            }),
            coefficients: vec![
                vec![-0.42, 0.97, -2.52, -1.08],
                vec![0.53, -0.32, -0.21, -0.94],
                vec![-0.11, -0.65, 2.73, 2.02],
            ],
            intercepts: vec![9.85, 2.24, -12.09],
        };
        ModelHandle::Loaded {
            path: PathBuf::from("model.json"),
            classifier: Arc::new(model),
        }
    }

    fn handle(classifier: impl Classifier + 'static) -> ModelHandle {
        ModelHandle::Loaded {
            path: PathBuf::from("test"),
            classifier: Arc::new(classifier),
        }
    }

    /// Returns the given rows regardless of input.
    struct Canned(Vec<Vec<f64>>);

    impl Classifier for Canned {
        fn feature_names(&self) -> Option<&[String]> {
            None
        }
        fn predict_proba(&self, _: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
            Ok(self.0.clone())
        }
    }

    /// Always faults.
    struct Broken;

    impl Classifier for Broken {
        fn feature_names(&self) -> Option<&[String]> {
            None
        }
        fn predict_proba(&self, _: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
            bail!("internal fault")
        }
    }

    fn assert_distributions(table: &PredictionTable) {
        for row in &table.rows {
            assert!(row.iter().all(|&p| p >= 0.0), "{row:?}");
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-6, "{row:?}");
        }
    }

    const EXACT: &str = "sepal_length,sepal_width,petal_length,petal_width\n\
                         5.1,3.5,1.4,0.2\n\
                         6.0,2.7,4.5,1.4\n\
                         7.7,3.0,6.1,2.3\n";

    #[test]
    fn exact_schema_scores_every_row() {
        let table = parse_csv(EXACT.as_bytes()).unwrap();
        let report = run(&table, &iris_model(true));

        assert!(report.notices.is_empty());
        let predictions = report.outcome.unwrap();
        assert_eq!(predictions.len(), 3);
        assert_eq!(predictions.columns(), CLASS_COLUMNS);
        assert_distributions(&predictions);
        assert!(predictions.rows[0][0] > 0.9);
        assert!(predictions.rows[2][2] > 0.9);
    }

    #[test]
    fn one_model_serves_concurrent_runs() {
        let table = parse_csv(EXACT.as_bytes()).unwrap();
        let model = iris_model(true);

        let (a, b) = std::thread::scope(|s| {
            let first = s.spawn(|| run(&table, &model.clone()));
            let second = s.spawn(|| run(&table, &model.clone()));
            (first.join().unwrap(), second.join().unwrap())
        });

        let a = a.outcome.unwrap();
        let b = b.outcome.unwrap();
        assert_distributions(&a);
        assert_eq!(a, b);
    }

    #[test]
    fn projection_follows_schema_order() {
        let table = parse_csv("d,x,a,c,b\n4,0,1,3,2\n40,0,10,30,20\n".as_bytes()).unwrap();
        let schema = names(&["a", "b", "c", "d"]);
        let r = reconcile(&table, Some(schema.as_slice()));

        assert_eq!(r.input.columns, schema);
        assert_eq!(
            r.input.to_f64_rows().unwrap(),
            vec![vec![1.0, 2.0, 3.0, 4.0], vec![10.0, 20.0, 30.0, 40.0]]
        );
        assert!(r.missing.is_empty());
        assert_eq!(r.extra, names(&["x"]));
        assert_eq!(r.notices(), vec![Notice::ExtraColumns(names(&["x"]))]);
    }

    #[test]
    fn missing_column_warns_but_still_predicts() {
        let table = parse_csv("a,b,c\n1,2,3\n".as_bytes()).unwrap();
        let schema = names(&["a", "b", "c", "d"]);
        let r = reconcile(&table, Some(schema.as_slice()));
        assert_eq!(r.missing, names(&["d"]));
        assert_eq!(r.input.width(), 3);

        // A classifier that tolerates the gap still produces output.
        let report = run(&table, &handle(Canned(vec![vec![0.2, 0.3, 0.5]])));
        assert!(report.outcome.is_ok());
    }

    #[test]
    fn extra_id_column_is_dropped() {
        let csv = "id,sepal_length,sepal_width,petal_length,petal_width\n\
                   1,5.1,3.5,1.4,0.2\n\
                   2,6.3,3.3,6.0,2.5\n";
        let table = parse_csv(csv.as_bytes()).unwrap();
        let report = run(&table, &iris_model(true));

        assert_eq!(report.notices, vec![Notice::ExtraColumns(names(&["id"]))]);
        let predictions = report.outcome.unwrap();
        assert_eq!(predictions.len(), 2);
        assert_distributions(&predictions);
    }

    #[test]
    fn missing_petal_width_reports_warning_then_prediction_error() {
        let csv = "sepal_length,sepal_width,petal_length\n5.1,3.5,1.4\n";
        let table = parse_csv(csv.as_bytes()).unwrap();
        let report = run(&table, &iris_model(true));

        assert_eq!(
            report.notices,
            vec![Notice::MissingColumns(names(&["petal_width"]))]
        );
        match report.outcome {
            Err(PipelineError::Prediction(msg)) => assert!(msg.contains("X has 3 features"), "{msg}"),
            other => panic!("expected PredictionError, got {other:?}"),
        }
    }

    #[test]
    fn positional_model_uses_file_order() {
        let table = parse_csv("w,x,y,z\n5.1,3.5,1.4,0.2\n".as_bytes()).unwrap();
        let r = reconcile(&table, None);
        assert_eq!(r.input, table.positional());
        assert!(r.notices().is_empty());

        let report = run(&table, &iris_model(false));
        assert!(report.notices.is_empty());
        assert!(report.outcome.unwrap().rows[0][0] > 0.9);
    }

    #[test]
    fn row_order_is_preserved() {
        let mut csv = String::from("sepal_length,sepal_width,petal_length,petal_width\n");
        let samples = [
            "5.1,3.5,1.4,0.2",
            "7.7,3.0,6.1,2.3",
            "6.0,2.7,4.5,1.4",
            "4.9,3.0,1.4,0.2",
            "6.9,3.1,5.4,2.1",
        ];
        for _ in 0..20 {
            for s in samples {
                csv.push_str(s);
                csv.push('\n');
            }
        }
        let table = parse_csv(csv.as_bytes()).unwrap();
        let predictions = run(&table, &iris_model(true)).outcome.unwrap();

        assert_eq!(predictions.len(), 100);
        let expected = [0, 2, 1, 0, 2];
        for (i, row) in predictions.rows.iter().enumerate() {
            let best = (0..3).max_by(|&a, &b| row[a].total_cmp(&row[b])).unwrap();
            assert_eq!(best, expected[i % 5], "row {i}: {row:?}");
        }
    }

    #[test]
    fn header_only_upload_yields_empty_predictions() {
        let table = parse_csv("sepal_length,sepal_width,petal_length,petal_width\n".as_bytes()).unwrap();
        let predictions = run(&table, &iris_model(true)).outcome.unwrap();
        assert!(predictions.is_empty());
    }

    #[test]
    fn unavailable_model_aborts() {
        let table = parse_csv(EXACT.as_bytes()).unwrap();
        let model = ModelHandle::Unavailable {
            path: PathBuf::from("model.json"),
            reason: "model.json not found".into(),
        };
        let report = run(&table, &model);
        assert!(report.notices.is_empty());
        assert!(matches!(
            report.outcome,
            Err(PipelineError::ModelUnavailable { .. })
        ));
    }

    #[test]
    fn classifier_faults_become_prediction_errors() {
        let table = parse_csv(EXACT.as_bytes()).unwrap();
        let report = run(&table, &handle(Broken));
        assert_eq!(
            report.outcome,
            Err(PipelineError::Prediction("internal fault".into()))
        );
    }

    #[test]
    fn malformed_output_is_rejected() {
        let table = parse_csv("a\n1\n2\n".as_bytes()).unwrap();

        let short = run(&table, &handle(Canned(vec![vec![1.0, 0.0, 0.0]])));
        assert!(matches!(short.outcome, Err(PipelineError::Prediction(_))));

        let wide = run(&table, &handle(Canned(vec![vec![0.5, 0.5]; 2])));
        assert!(matches!(wide.outcome, Err(PipelineError::Prediction(_))));

        let unnormalised = run(&table, &handle(Canned(vec![vec![0.5, 0.5, 0.5]; 2])));
        assert!(matches!(unnormalised.outcome, Err(PipelineError::Prediction(_))));

        let negative = run(&table, &handle(Canned(vec![vec![1.5, -0.5, 0.0]; 2])));
        assert!(matches!(negative.outcome, Err(PipelineError::Prediction(_))));
    }

    #[test]
    fn string_features_fail_prediction() {
        let csv = "sepal_length,sepal_width,petal_length,petal_width\n5.1,3.5,1.4,setosa\n";
        let table = parse_csv(csv.as_bytes()).unwrap();
        let report = run(&table, &iris_model(true));
        match report.outcome {
            Err(PipelineError::Prediction(msg)) => assert!(msg.contains("petal_width"), "{msg}"),
            other => panic!("expected PredictionError, got {other:?}"),
        }
    }
}
