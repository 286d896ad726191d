use crate::spec::{CanonicalSpec, find_specs};

fn specs(text: &str) -> Vec<String> {
    find_specs(text).map(|s| s.as_str().to_string()).collect()
}

#[test]
fn test_finds_specs_in_declarations() {
    let text = "typedef Eigen::Matrix<double, 4, 4> M4;\nMatrix<float,2,2> a, b;";
    assert_eq!(specs(text), ["Matrix<double,4,4>", "Matrix<float,2,2>"]);
}

#[test]
fn test_finds_nested_template_argument() {
    let text = "std::vector<Matrix<int, 3, 1>> points;";
    assert_eq!(specs(text), ["Matrix<int,3,1>"]);
}

#[test]
fn test_ignores_similar_names_and_other_arities() {
    let text = "MatrixBase<Derived> x; MyMatrix<float,2,2> y; Matrix<float,2,2,RowMajor> z;";
    assert!(specs(text).is_empty());
}

#[test]
fn test_spaced_token_spelling_matches() {
    // Token-joined spellings produced by the header analyzer.
    let text = "Matrix < double , Eigen :: Dynamic , 1 > v ;";
    assert_eq!(specs(text), ["Matrix<double,Dynamic,1>"]);
    assert_eq!(
        find_specs(text).next(),
        Some(CanonicalSpec::new("Matrix<double,Dynamic,1>"))
    );
}
