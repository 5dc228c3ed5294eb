use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    moog-setup completions --shell bash > ~/.bash_completion.d/moog-setup\n\n\
                  Generate zsh completions:\n    moog-setup completions --shell zsh > ~/.zfunc/_moog-setup\n\n\
                  Generate fish completions:\n    moog-setup completions --shell fish > ~/.config/fish/completions/moog-setup.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(long, short = 's', value_enum)]
    pub shell: Shell,
}
