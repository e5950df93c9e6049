//! End-to-end runs of the parse → similarity matrix → cluster pipeline.

use dejavu::tedium::matrix::pairwise;
use dejavu::{Document, GrossSim, SharedNeighborClusterer, SimilarityComputer, parse_document};

const ARTICLE_ONE: &str = r#"
<html><head><title>one</title></head>
<body>
  <div class="header nav"><a>home</a><a>about</a></div>
  <div class="content"><h1>First story</h1><p>text</p><p>more text</p></div>
  <div class="footer">fine print</div>
</body></html>"#;

const ARTICLE_TWO: &str = r#"
<html><head><title>two</title></head>
<body>
  <div class="header nav"><a>home</a><a>about</a></div>
  <div class="content"><h1>Second story</h1><p>text</p><p>more text</p></div>
  <div class="footer">fine print</div>
</body></html>"#;

const BARE_FORM: &str = r#"
<html><head></head>
<body>
  <form class="login-box"><input><input><button>go</button></form>
</body></html>"#;

fn batch() -> Vec<Document> {
    vec![
        parse_document(ARTICLE_ONE, "article-one.html").unwrap(),
        parse_document(ARTICLE_TWO, "article-two.html").unwrap(),
        parse_document(BARE_FORM, "login.html").unwrap(),
    ]
}

#[test]
fn identical_singleton_documents_score_one() {
    let a = parse_document("<p>x</p>", "a").unwrap();
    let b = parse_document("<p>y</p>", "b").unwrap();
    let sim = GrossSim::web(0.8).unwrap();
    // same element skeleton, both class sets empty
    assert_eq!(sim.compute(&a, &b), 1.0);
}

#[test]
fn template_twins_cluster_together_outlier_stays_apart() {
    let docs = batch();
    let sim = GrossSim::web(0.8).unwrap();
    let matrix = pairwise(&docs, 1.0, true, |a, b| sim.compute(a, b)).unwrap();

    // the two articles share a template, the form page does not
    assert!(matrix.get(0, 1) > 0.9);
    assert!(matrix.get(0, 2) < 0.75);
    assert!(matrix.get(1, 2) < 0.75);

    let labels: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();
    let clusterer = SharedNeighborClusterer::new(0.75, 100, 1).unwrap();
    let clusters = clusterer.cluster(&matrix, &labels).unwrap();

    assert_eq!(clusters.len(), 2);
    let twins: &Vec<String> = clusters
        .iter()
        .find(|c| c.len() == 2)
        .expect("one two-element cluster");
    assert!(twins.contains(&"article-one.html".to_string()));
    assert!(twins.contains(&"article-two.html".to_string()));
    let single = clusters.iter().find(|c| c.len() == 1).expect("one singleton");
    assert_eq!(single[0], "login.html");
}

#[test]
fn pipeline_is_deterministic() {
    let docs = batch();
    let sim = GrossSim::web(0.8).unwrap();
    let labels: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();
    let clusterer = SharedNeighborClusterer::new(0.75, 100, 1).unwrap();

    let first_matrix = pairwise(&docs, 1.0, true, |a, b| sim.compute(a, b)).unwrap();
    let second_matrix = pairwise(&docs, 1.0, true, |a, b| sim.compute(a, b)).unwrap();
    assert_eq!(first_matrix, second_matrix);

    let first = clusterer.cluster(&first_matrix, &labels).unwrap();
    let second = clusterer.cluster(&second_matrix, &labels).unwrap();
    assert_eq!(first, second);
}
