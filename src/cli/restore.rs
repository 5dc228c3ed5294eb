use clap::Parser;

/// Arguments for the restore command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Undo a run that was killed mid-build:\n    moog-setup restore\n\n\
                   Restore a checkout elsewhere:\n    moog-setup restore --repo ~/src/MOOG")]
pub struct RestoreArgs {}
