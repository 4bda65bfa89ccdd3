//! Startup banner.

use std::io::{self, Write};

const BANNER: &str = r"
                 __                    __       __
  ____  ____  / /_ _      ______ _/ /______/ /_
 / __ \/ __ \/ __ \ | /| / / __ `/ __/ ___/ __ \
/ /_/ / /_/ / /_/ / |/ |/ / /_/ / /_/ /__/ / / /
\____/\____/_.___/|__/|__/\__,_/\__/\___/_/ /_/
";

/// Write the banner, version and usage disclaimer.
pub fn write_banner(w: &mut impl Write) -> io::Result<()> {
    writeln!(w, "{BANNER}")?;
    writeln!(w, "\t\toobwatch v{}\n", env!("CARGO_PKG_VERSION"))?;
    writeln!(w, "Use with caution. You are responsible for your actions.")?;
    writeln!(
        w,
        "Developers assume no liability and are not responsible for any misuse or damage.\n"
    )?;
    Ok(())
}
