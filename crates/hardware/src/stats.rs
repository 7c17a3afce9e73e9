//! Cache statistics collection and reporting.
//!
//! This module tracks performance counters for the cache controller. It provides:
//! 1. **Requests:** Accepted reads and writes, hits and misses.
//! 2. **Replacement:** Evictions of valid lines and dirty write-backs.
//! 3. **Backing store traffic:** Fetches and store writes.
//! 4. **Time:** Ticks elapsed and resets observed.

use std::fmt;

/// Cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Ticks elapsed (including reset ticks).
    pub cycles: u64,
    /// Requests accepted in IDLE.
    pub requests: u64,
    /// Accepted read requests.
    pub reads: u64,
    /// Accepted write requests.
    pub writes: u64,
    /// Requests completed from LOOKUP.
    pub hits: u64,
    /// Requests completed from FILL.
    pub misses: u64,
    /// Misses that replaced a valid line.
    pub evictions: u64,
    /// Dirty victims flushed to the backing store.
    pub writebacks: u64,
    /// Backing-store reads for read misses.
    pub fetches: u64,
    /// All backing-store writes (write-through and write-back).
    pub store_writes: u64,
    /// Reset assertions.
    pub resets: u64,
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "requests", "memory"];

impl CacheStats {
    /// Completed requests (hits + misses).
    pub const fn completed(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of completed requests that hit, or 0 when none completed.
    pub fn hit_rate(&self) -> f64 {
        let total = self.completed();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Fraction of completed requests that missed, or 0 when none completed.
    pub fn miss_rate(&self) -> f64 {
        let total = self.completed();
        if total == 0 {
            0.0
        } else {
            self.misses as f64 / total as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Renders the requested sections as the text `print_sections` prints.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let pct = |n: u64, d: u64| if d == 0 { 0.0 } else { n as f64 / d as f64 * 100.0 };
        let mut out = String::new();
        let line = "----------------------------------------------------------\n";

        if want("summary") {
            out.push_str("\n==========================================================\n");
            out.push_str("CACHE SIMULATION STATISTICS\n");
            out.push_str("==========================================================\n");
            out.push_str(&format!("sim_cycles               {}\n", self.cycles));
            out.push_str(&format!("sim_requests             {}\n", self.requests));
            out.push_str(&format!("hit_rate                 {:.4}\n", self.hit_rate()));
            out.push_str(&format!("miss_rate                {:.4}\n", self.miss_rate()));
            out.push_str(&format!("resets                   {}\n", self.resets));
            out.push_str(line);
        }
        if want("requests") {
            let total = self.completed();
            out.push_str("REQUESTS\n");
            out.push_str(&format!(
                "  op.read                {} ({:.2}%)\n",
                self.reads,
                pct(self.reads, self.requests)
            ));
            out.push_str(&format!(
                "  op.write               {} ({:.2}%)\n",
                self.writes,
                pct(self.writes, self.requests)
            ));
            out.push_str(&format!(
                "  hits                   {} ({:.2}%)\n",
                self.hits,
                pct(self.hits, total)
            ));
            out.push_str(&format!(
                "  misses                 {} ({:.2}%)\n",
                self.misses,
                pct(self.misses, total)
            ));
            out.push_str(line);
        }
        if want("memory") {
            out.push_str("MEMORY\n");
            out.push_str(&format!("  evictions              {}\n", self.evictions));
            out.push_str(&format!("  writebacks             {}\n", self.writebacks));
            out.push_str(&format!("  fetches                {}\n", self.fetches));
            out.push_str(&format!("  store_writes           {}\n", self.store_writes));
            out.push_str(line);
        }
        out
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cycles={} requests={} hits={} misses={} evictions={} writebacks={} fetches={} store_writes={}",
            self.cycles,
            self.requests,
            self.hits,
            self.misses,
            self.evictions,
            self.writebacks,
            self.fetches,
            self.store_writes
        )
    }
}
