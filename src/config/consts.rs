// src/config/consts.rs

// Net config
pub const USER_AGENT: &str = concat!("race_results/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Output
pub const DEFAULT_OUTPUT_FILE: &str = "results.html";
pub const STYLESHEET_HREF: &str = "rr.css";
pub const REPORT_TITLE: &str = "Race Results";

// Roster
pub const DEFAULT_ROSTER_DELIMITER: u8 = b',';

// BestRace
pub const BESTRACE_BASE: &str = "http://www.bestrace.com";

// CoolRunning
pub const COOLRUNNING_BASE: &str = "http://www.coolrunning.com";
pub const COOLRUNNING_DEFAULT_STATE: &str = "ma";

// CompuScore
pub const COMPUSCORE_BASE: &str = "http://compuscore.com";
pub const COMPUSCORE_RACE_HOST: &str = "http://www.compuscore.com";

// L&M Computer Sports
pub const LMSPORTS_BASE: &str = "http://www.lmsports.com/";

// New York Road Runners
pub const NYRR_ARCHIVE_URL: &str =
    "http://web2.nyrrc.org/cgi-bin/start.cgi/aes-programs/results/resultsarchive.htm";
pub const NYRR_RESULT_URL_BASE: &str =
    "http://web2.nyrrc.org/cgi-bin/start.cgi/aes-programs/results/startup.html";
pub const NYRR_HOME: &str = "http://www.nyrr.org";
pub const NYRR_MAX_ROWS: &str = "500";

// Active.com
pub const ACTIVE_BASE: &str = "http://results.active.com";
pub const ACTIVE_DEFAULT_RADIUS: u32 = 50;
pub const ACTIVE_CSV_SUFFIX: &str = ".csv?per_page=100000";

/// CompuScore files a month's races under these folder names.
pub fn compuscore_month_folder(month: u32) -> &'static str {
    match month {
        1 | 2 => "janfeb",
        3 => "march",
        4 => "april",
        5 => "may",
        6 => "june",
        7 => "july",
        8 => "aug",
        9 => "sept",
        10 => "october",
        _ => "novdec",
    }
}
