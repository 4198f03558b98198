//! Update check: query the service and print the report.

use vinupdate::query::Vin;
use vinupdate::report::pretty_json;
use vinupdate::{UpdateCheck, UpdateSession};

use crate::error::CliError;
use crate::output::{print_report, Output};

/// Query available updates for `vin` and print them.
///
/// With `raw`, the request payload and the formatted response body are
/// printed before the report.
pub fn run(
    session: &UpdateSession,
    vin: &Vin,
    raw: bool,
    out: &dyn Output,
) -> Result<UpdateCheck, CliError> {
    out.println(&format!("Checking updates for {}", vin));
    let check = session.check(vin)?;

    if raw {
        print_raw(out, &check);
    }
    print_report(out, &check.report);

    Ok(check)
}

fn print_raw(out: &dyn Output, check: &UpdateCheck) {
    out.header("Request");
    out.println(&check.query.request_payload);
    out.newline();
    out.header("Response");
    out.println(&pretty_json(&check.query.raw_body));
    out.newline();
}
