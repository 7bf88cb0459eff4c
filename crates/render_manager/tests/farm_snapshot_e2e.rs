use render_manager::farm::{
    collect_jobs, collect_render_layers_from_snapshot, load_snapshot, load_snapshot_or_empty,
    write_snapshot, FarmError, JobsSnapshot, StatusQuery,
};
use render_manager::layers::{latest_in_groups, versions_of, LayerSource, TokenConfig};
use std::collections::HashMap;
use tempfile::TempDir;

/// Farm answering from canned outputs keyed by the joined arguments.
#[derive(Default)]
struct CannedFarm {
    answers: HashMap<String, String>,
}

impl CannedFarm {
    fn answer(mut self, args: &str, output: &str) -> Self {
        self.answers.insert(args.to_string(), output.to_string());
        self
    }
}

impl StatusQuery for CannedFarm {
    fn query(&self, args: &[String]) -> render_manager::farm::Result<Vec<u8>> {
        let key = args.join(" ");
        if key.contains("Status=Failed") {
            return Err(FarmError::ExternalToolFailure {
                command: "deadlinecommand".to_string(),
                reason: "exit status: 1".to_string(),
            });
        }
        Ok(self.answers.get(&key).cloned().unwrap_or_default().into_bytes())
    }
}

fn job_block(id: u32, layer: &str, version: &str, user: &str) -> String {
    format!(
        "ID={id}\nJobName=LGT_KAF_010_{version}_{layer}\nBatchName=LGT_KAF_010_{version}\n\
         FramesList=1001-1020\nUserName={user}\nOutputDirectories=/frames/{layer}/LGT_KAF_010_{version}\n"
    )
}

fn farm() -> CannedFarm {
    let completed = [
        job_block(1, "RND_BG_TECH", "v0024", "maxi"),
        job_block(2, "RND_BG_TECH", "v0026", "maxi"),
        job_block(3, "RND_FG_BTY", "v0012", "ana"),
        job_block(4, "XYZ_FG_BTY", "v0013", "ana"),
    ]
    .join("\n");

    CannedFarm::default()
        .answer(
            "-GetJobsFilterAnd PluginName=Nuke Status=Completed BatchName=KAF_010",
            &completed,
        )
        .answer(
            "-GetJobsFilterAnd PluginName=Nuke Status=Rendering BatchName=KAF_010",
            &job_block(5, "RND_BG_TECH", "v0027", "ana"),
        )
        .answer("-GetJobDetails 5", "Progress: 40 %\nErrors: 0\n")
}

#[test]
fn test_collect_write_reload_and_reduce() {
    let farm = farm();
    let tokens = TokenConfig::default();
    let jobs = collect_jobs(
        &farm,
        "KAF",
        "010",
        "Nuke",
        &["Completed", "Failed", "Queued", "Rendering"],
    );
    assert_eq!(jobs.keys().collect::<Vec<_>>(), vec!["Completed", "Rendering"]);

    let snapshot = JobsSnapshot::from_jobs(&jobs, &farm, &tokens, "KAF", "010", "Nuke");
    assert_eq!(snapshot.metadata.total_jobs, 5);

    let out = TempDir::new().unwrap();
    let path = write_snapshot(&snapshot, out.path()).unwrap();
    assert!(path.ends_with("jobs_KAF_010_Nuke.json"));

    let reloaded = load_snapshot(&path).unwrap();
    assert_eq!(reloaded, snapshot);

    let groups = collect_render_layers_from_snapshot(&reloaded, &tokens);
    let latest = latest_in_groups(&groups);
    assert_eq!(latest.len(), 2);

    let tech = latest.iter().find(|l| l.name() == "RND_BG_TECH").unwrap();
    assert_eq!(tech.int_version(), 27);
    assert_eq!(tech.progress(), Some("40 %"));
    assert_eq!(tech.user(), Some("ana"));
    assert_eq!(tech.source(), LayerSource::Farm);
    assert_eq!(tech.frame_count(), 20);

    let versions: Vec<u32> = versions_of(&groups, "RND_BG_TECH")
        .iter()
        .map(|l| l.int_version())
        .collect();
    assert_eq!(versions, vec![27, 26, 24]);
}

#[test]
fn test_unreachable_farm_yields_no_jobs() {
    let farm = CannedFarm::default();
    let jobs = collect_jobs(&farm, "KAF", "020", "Nuke", &["Failed", "Completed"]);
    assert!(jobs.is_empty());
}

#[test]
fn test_legacy_snapshot_timestamp_key() {
    let out = TempDir::new().unwrap();
    let path = out.path().join("jobs_KAF_010_Nuke.json");
    std::fs::write(
        &path,
        r#"{
  "metadata": {
    "sequence": "KAF",
    "shot": "010",
    "plugin": "Nuke",
    "collection_timestamp": "2024-03-01 10:00:00",
    "total_jobs": 1
  },
  "jobs_by_status": {
    "Completed": [
      {
        "job_name": "LGT_KAF_010_v0026_RND_BG_TECH",
        "batch_name": "LGT_KAF_010_v0026",
        "render_layer": "RND_BG_TECH",
        "version": "0026",
        "user": "maxi",
        "frames": "1001-1020",
        "output_directories": "/frames/RND_BG_TECH/LGT_KAF_010_v0026"
      }
    ]
  }
}"#,
    )
    .unwrap();

    let snapshot = load_snapshot_or_empty(&path);
    assert_eq!(snapshot.metadata.timestamp, "2024-03-01 10:00:00");
    assert_eq!(snapshot.total_jobs(), 1);

    let missing = load_snapshot_or_empty(&out.path().join("missing.json"));
    assert!(missing.is_empty());
}
