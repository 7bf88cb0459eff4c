//! Parsers for `deadlinecommand` text output

use std::collections::BTreeMap;

/// Fields of one job or one job-details listing.
pub type Fields = BTreeMap<String, String>;

/// Parse `key=value` lines into one map per job.
///
/// Jobs are separated by blank lines. CRLF and LF endings are both accepted;
/// lines without `=` are skipped.
pub fn parse_job_blocks(output: &str) -> Vec<Fields> {
    let mut blocks = Vec::new();
    let mut current = Fields::new();

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            current.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Parse `key: value` lines, splitting at the first `:`.
///
/// Lines without `:` and section headers are skipped.
pub fn parse_job_details(output: &str) -> Fields {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_blocks_crlf() {
        let output = "ID=5f1\r\nJobName=LGT_KAF_010_v0026_RND_BG_TECH\r\nBatchName=LGT_KAF_010_v0026\r\n\r\nID=5f2\r\nJobName=LGT_KAF_010_v0026_RND_FG_BTY\r\n\r\n";
        let blocks = parse_job_blocks(output);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["ID"], "5f1");
        assert_eq!(blocks[0]["BatchName"], "LGT_KAF_010_v0026");
        assert_eq!(blocks[1]["JobName"], "LGT_KAF_010_v0026_RND_FG_BTY");
    }

    #[test]
    fn test_parse_job_blocks_lf_and_malformed_lines() {
        let output = "ID=1\nnot a field\nOutputDirectories=I:/frames=x\n\n\n\nID=2";
        let blocks = parse_job_blocks(output);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].len(), 2);
        // only the first '=' separates key and value
        assert_eq!(blocks[0]["OutputDirectories"], "I:/frames=x");
        assert_eq!(blocks[1]["ID"], "2");
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_job_blocks("").is_empty());
        assert!(parse_job_blocks("\r\n\r\n").is_empty());
        assert!(parse_job_details("").is_empty());
    }

    #[test]
    fn test_parse_job_details() {
        let output = "Job\r\nProgress: 45 %\r\nErrors: 0\r\nTask States\r\nCompleted: 9\r\nOutput: C:/a:b\r\n";
        let details = parse_job_details(output);
        assert_eq!(details.len(), 4);
        assert_eq!(details["Progress"], "45 %");
        assert_eq!(details["Completed"], "9");
        assert_eq!(details["Output"], "C:/a:b");
    }
}
