//! OS-level AES support heuristics.
//!
//! Each heuristic is a pure function over captured text so it can be
//! exercised with synthetic input. The OS checker is responsible for
//! obtaining the text and writing it into the report.

/// Verdict of one detection method plus the evidence it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicResult {
    /// Whether the evidence indicates AES support.
    pub supported: bool,

    /// Raw text the verdict was derived from.
    pub evidence: String,

    /// Body of the `[[...]]` summary line written after the evidence.
    pub summary: String,
}

/// Per-CPU AES flag counts from a cpuinfo-style pseudo-file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuFlagTally {
    pub total_cpus: usize,
    pub aes_cpus: usize,
}

impl CpuFlagTally {
    /// True only when every CPU reports `aes`.
    pub fn all_support_aes(&self) -> bool {
        self.aes_cpus > 0 && self.aes_cpus == self.total_cpus
    }
}

/// Count CPU records and the records whose feature list contains `aes`.
///
/// A record is any line whose label (text before the first `:`) equals one
/// of `keys`.
pub fn tally_cpu_flags(cpuinfo: &str, keys: &[String]) -> CpuFlagTally {
    let mut tally = CpuFlagTally::default();

    for line in cpuinfo.lines() {
        let Some((label, features)) = line.split_once(':') else {
            continue;
        };
        if !keys.iter().any(|k| k == label.trim()) {
            continue;
        }

        tally.total_cpus += 1;
        if features.split_whitespace().any(|flag| flag == "aes") {
            tally.aes_cpus += 1;
        }
    }

    tally
}

/// CPU-flags heuristic over the contents of `/proc/cpuinfo`.
pub fn cpu_flags(cpuinfo: &str, keys: &[String]) -> HeuristicResult {
    let tally = tally_cpu_flags(cpuinfo, keys);
    HeuristicResult {
        supported: tally.all_support_aes(),
        evidence: cpuinfo.to_string(),
        summary: format!(
            " cpus: {} cpus with aes: {}",
            tally.total_cpus, tally.aes_cpus
        ),
    }
}

/// Whether `lscpu` output has a `Flags:` line listing `aes`.
pub fn lscpu_reports_aes(output: &str) -> bool {
    output
        .lines()
        .filter(|line| line.starts_with("Flags:"))
        .any(|line| line.split_whitespace().any(|flag| flag == "aes"))
}

/// CPU-topology-tool heuristic over `lscpu` standard output.
pub fn cpu_topology(output: &str) -> HeuristicResult {
    let supported = lscpu_reports_aes(output);
    HeuristicResult {
        supported,
        evidence: output.to_string(),
        summary: format!("lscpu detected aes: {}", supported),
    }
}

/// Whether a driver name appears at the end of some `<field> : <name>` line.
pub fn driver_registered(crypto: &str, driver: &str) -> bool {
    let suffix = format!(": {}", driver);
    crypto.lines().any(|line| line.ends_with(&suffix))
}

/// Kernel-crypto-registry heuristic over the contents of `/proc/crypto`.
///
/// Supported only when every driver in `drivers` is registered. An empty
/// driver list never counts as support.
pub fn kernel_crypto(crypto: &str, drivers: &[String]) -> HeuristicResult {
    let found: Vec<(&str, bool)> = drivers
        .iter()
        .map(|d| (d.as_str(), driver_registered(crypto, d)))
        .collect();

    let summary = found
        .iter()
        .map(|(name, present)| format!(" {}: {}", name, present))
        .collect::<String>();

    HeuristicResult {
        supported: !found.is_empty() && found.iter().all(|(_, present)| *present),
        evidence: crypto.to_string(),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<String> {
        vec!["flags".to_string(), "Features".to_string()]
    }

    fn drivers() -> Vec<String> {
        vec!["aesni_intel".to_string(), "aes_x86_64".to_string()]
    }

    fn cpu_record(n: usize, flags: &str) -> String {
        format!(
            "processor\t: {n}\nvendor_id\t: GenuineIntel\nflags\t\t: {flags}\nvmx flags\t: vnmi\n\n"
        )
    }

    #[test]
    fn all_cpus_with_aes_is_supported() {
        let text: String = (0..4).map(|n| cpu_record(n, "fpu sse2 aes avx")).collect();
        let result = cpu_flags(&text, &keys());
        assert!(result.supported);
        assert_eq!(result.summary, " cpus: 4 cpus with aes: 4");
        assert_eq!(result.evidence, text);
    }

    #[test]
    fn zero_cpu_records_is_unsupported() {
        let result = cpu_flags("", &keys());
        assert!(!result.supported);
        assert_eq!(result.summary, " cpus: 0 cpus with aes: 0");
    }

    #[test]
    fn partial_aes_support_is_unsupported() {
        let text = [
            cpu_record(0, "fpu aes"),
            cpu_record(1, "fpu aes"),
            cpu_record(2, "fpu sse2"),
        ]
        .concat();
        let tally = tally_cpu_flags(&text, &keys());
        assert_eq!(
            tally,
            CpuFlagTally {
                total_cpus: 3,
                aes_cpus: 2
            }
        );
        assert!(!cpu_flags(&text, &keys()).supported);
    }

    #[test]
    fn aes_prefixed_flags_do_not_count() {
        let text = cpu_record(0, "fpu aes_ctr vaes");
        assert!(!cpu_flags(&text, &keys()).supported);
    }

    #[test]
    fn arm_features_label_is_recognised() {
        let text = "processor\t: 0\nFeatures\t: fp asimd aes pmull sha1\n";
        assert!(cpu_flags(text, &keys()).supported);
    }

    #[test]
    fn lscpu_flags_line() {
        let output = "Architecture:        x86_64\nFlags:               fpu vme aes avx\n";
        let result = cpu_topology(output);
        assert!(result.supported);
        assert_eq!(result.summary, "lscpu detected aes: true");
    }

    #[test]
    fn lscpu_without_aes() {
        let output = "Architecture:        x86_64\nFlags:               fpu vme avx\n";
        assert!(!cpu_topology(output).supported);
    }

    #[test]
    fn lscpu_aes_outside_flags_line_is_ignored() {
        let output = "Model name:          aes\nFlags:               fpu\n";
        assert!(!lscpu_reports_aes(output));
    }

    #[test]
    fn both_drivers_present_is_supported() {
        let crypto = "name         : aes\ndriver       : aes-aesni\nmodule       : aesni_intel\n\n\
                      name         : aes\ndriver       : aes-generic\nmodule       : aes_x86_64\n";
        let result = kernel_crypto(crypto, &drivers());
        assert!(result.supported);
        assert_eq!(result.summary, " aesni_intel: true aes_x86_64: true");
    }

    #[test]
    fn single_driver_is_unsupported() {
        let crypto = "module       : aesni_intel\n";
        let result = kernel_crypto(crypto, &drivers());
        assert!(!result.supported);
        assert_eq!(result.summary, " aesni_intel: true aes_x86_64: false");
    }

    #[test]
    fn driver_must_end_the_line() {
        assert!(!driver_registered("module : aesni_intel_extra\n", "aesni_intel"));
    }

    #[test]
    fn empty_driver_list_is_unsupported() {
        assert!(!kernel_crypto("module : aesni_intel\n", &[]).supported);
    }
}
