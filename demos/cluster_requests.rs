use sift::{cluster_with, summarize, Kmeans, RequestRecord, SeparationGrade};

fn synthetic_traffic() -> Vec<RequestRecord> {
    // Two obvious behavioral profiles: small fast page loads and heavy
    // slow volumetric bursts.
    let mut records = Vec::new();
    for id in 0..6u64 {
        let jitter = id as f64;
        records.push(RequestRecord {
            id,
            request_size: 280.0 + jitter * 15.0,
            response_size: 1400.0 + jitter * 60.0,
            response_time: 110.0 + jitter * 8.0,
            http_method: "GET".to_string(),
            status_code: 200,
            url_length: 38.0 + jitter,
            param_count: 2.0,
            user_agent_length: 75.0 + jitter,
            is_ajax: false,
            attack_type_id: 0,
            attack_type: "benign".to_string(),
            description: "regular page load".to_string(),
        });
    }
    for id in 6..12u64 {
        let jitter = (id - 6) as f64;
        records.push(RequestRecord {
            id,
            request_size: 8800.0 + jitter * 30.0,
            response_size: 47_000.0 + jitter * 200.0,
            response_time: 9300.0 + jitter * 40.0,
            http_method: "POST".to_string(),
            status_code: 503,
            url_length: 1850.0 + jitter * 10.0,
            param_count: 44.0,
            user_agent_length: 470.0 + jitter * 2.0,
            is_ajax: true,
            attack_type_id: 4,
            attack_type: "flood".to_string(),
            description: "volumetric burst".to_string(),
        });
    }
    records
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let records = synthetic_traffic();
    let result = cluster_with(&records, Kmeans::new(2).with_seed(7))?;

    println!(
        "clusters={} silhouette={:.3} grade={:?} converged={}",
        result.clusters,
        result.silhouette,
        SeparationGrade::from_score(result.silhouette),
        result.termination.converged()
    );

    for centroid in &result.centroids {
        println!("  centroid {}:", centroid.cluster);
        for (name, value) in centroid.features.iter().zip(centroid.values.iter()) {
            println!("    {name:>18} {value:.3}");
        }
    }

    for summary in summarize(&result.records) {
        println!(
            "  group {}: {} records ({:.0}%), dominant={} avg_rt={:.1}ms avg_size={:.0}B",
            summary.cluster,
            summary.count,
            summary.share * 100.0,
            summary.dominant_attack,
            summary.mean_response_time,
            summary.mean_request_size
        );
    }

    Ok(())
}
