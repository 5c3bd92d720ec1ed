//! End-to-end include runs against a mock HTTP server and local fixtures.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use excerpt_core::{DocumentCache, Error, Fetcher, Includer};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WIRELESS_NED: &str = r#"package inet.tutorials.wireless;

import inet.node.inet.INetworkNode;

network WirelessA
{
    parameters:
        @display("bgb=650,500;bgg=100,1,grey95");
        @figure[title](type=label; pos=0,-1; anchor=sw; color=darkblue);
    submodules:
        hostA: <default(hostType)> like INetworkNode {
            @display("p=50,325");
        }
}
"#;

const OMNETPP_INI: &str = "[General]\nnetwork = WirelessA # the network\nsim-time-limit = 20s\n\n[Config Wireless01]\ndescription = Two hosts\n";

#[tokio::test]
async fn fetches_each_remote_source_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wireless/WirelessA.ned"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WIRELESS_NED))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wireless/omnetpp.ini"))
        .respond_with(ResponseTemplate::new(200).set_body_string(OMNETPP_INI))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/wireless/step1.html", server.uri());
    let includer = Includer::new(Fetcher::new().unwrap().with_base_url(&base).unwrap());

    let document = r##"<h2>Step 1</h2>
<pre src="WirelessA.ned" from="network" upto="^}"></pre>
<pre src="omnetpp.ini" after="\[General\]" until="^$" comment="#"></pre>
<pre src="WirelessA.ned" after="submodules:" until="^}"></pre>
<pre src="omnetpp.ini" from="\[Config Wireless01\]"></pre>"##;

    let report = includer.include(document).await;
    assert_eq!(report.failures().count(), 0);

    let network = report.snippets[0].outcome.as_ref().unwrap();
    assert_eq!(network.start_line, 5);
    assert_eq!(network.lines.len(), 10);
    assert_eq!(report.snippets[0].language, "ned");

    let general = report.snippets[1].outcome.as_ref().unwrap();
    assert_eq!(general.start_line, 2);
    assert_eq!(general.text(), "network = WirelessA\nsim-time-limit = 20s");

    let submodules = report.snippets[2].outcome.as_ref().unwrap();
    assert_eq!(submodules.start_line, 11);

    let config = report.snippets[3].outcome.as_ref().unwrap();
    assert_eq!(config.start_line, 5);
    assert_eq!(config.text(), "[Config Wireless01]\ndescription = Two hosts");

    assert!(report.document.starts_with("<h2>Step 1</h2>\n<pre class=\"excerpt\""));
    assert!(report.document.contains("<span class=\"keyword\">network</span>"));
    // `expect(1)` is verified when `server` drops.
}

#[tokio::test]
async fn failed_source_does_not_affect_others() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/good.ini"))
        .respond_with(ResponseTemplate::new(200).set_body_string(OMNETPP_INI))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone.ned"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let includer = Includer::new(Fetcher::new().unwrap());
    let document = format!(
        r#"<pre src="{0}/gone.ned" from="network"></pre>
<pre src="{0}/good.ini" from="sim-time"></pre>
<pre src="{0}/gone.ned"></pre>"#,
        server.uri()
    );

    let report = includer.include(&document).await;

    for index in [0, 2] {
        match &report.snippets[index].outcome {
            Err(Error::SourceUnavailable { source, .. }) => {
                assert!(matches!(source.as_ref(), Error::NotFound(_)), "{source}");
            },
            other => panic!("placeholder {index}: expected SourceUnavailable, got {other:?}"),
        }
    }
    let good = report.snippets[1].outcome.as_ref().unwrap();
    assert_eq!(good.text(), "sim-time-limit = 20s\n\n[Config Wireless01]\ndescription = Two hosts");
    assert_eq!(report.document.matches("excerpt-error").count(), 2);
}

#[tokio::test]
async fn local_sources_relative_to_document() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("code")).unwrap();
    std::fs::write(
        dir.path().join("code").join("worker.py"),
        "import os\n\n\ndef work(job):\n    return job.run()  # go\n\n\nif __name__ == '__main__':\n    work(None)\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("Dockerfile"), "FROM python:3.12\nCOPY code /app\n").unwrap();

    let cache = Arc::new(DocumentCache::new());
    let includer = Includer::new(Fetcher::new().unwrap().with_base_dir(dir.path()))
        .with_cache(Arc::clone(&cache));

    let document = r##"<pre src="code/worker.py" from="def work" until="^if" comment="#"></pre>
<pre src="Dockerfile"></pre>"##;
    let report = includer.include(document).await;

    let worker = report.snippets[0].outcome.as_ref().unwrap();
    assert_eq!(report.snippets[0].language, "python");
    assert_eq!(worker.start_line, 4);
    assert_eq!(worker.text(), "def work(job):\n    return job.run()");

    assert_eq!(report.snippets[1].language, "dockerfile");
    assert_eq!(report.snippets[1].outcome.as_ref().unwrap().lines.len(), 3);
    assert_eq!(cache.len(), 2);
}
