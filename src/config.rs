use std::path::{Path, PathBuf};
use std::time::Duration;
use std::fmt::{Display, Formatter};

use clap::Args;
use url::Url;

use sekolah_lib::query::MAX_LIMIT;

use crate::error::{self, Context};

mod shape;

pub const DEFAULT_API_URL: &str = match option_env!("SEKOLAH_API_URL") {
    Some(url) => url,
    None => "http://localhost:3000/api/v1/",
};
pub const DEFAULT_TOKEN_FILE: &str = "sekolah_token.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

pub const ENV_API_URL: &str = "SEKOLAH_API_URL";
pub const ENV_TOKEN_FILE: &str = "SEKOLAH_TOKEN_FILE";
pub const ENV_TIMEOUT: &str = "SEKOLAH_TIMEOUT";

pub trait TryDefault: Sized {
    type Error;

    fn try_default() -> Result<Self, Self::Error>;
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// a config file to load settings from, yaml or json
    ///
    /// can be given multiple times, later files override earlier ones
    #[arg(long, global = true)]
    config: Vec<PathBuf>,

    /// base url of the school api
    ///
    /// example: https://sekolah.sch.id/api/v1/
    #[arg(long, global = true)]
    api_url: Option<Url>,

    /// file that stores the session token
    ///
    /// if a file is not specified then "sekolah_token.json" in the current
    /// working directory is used
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: Url,
    pub token_file: PathBuf,
    pub timeout: Duration,
    pub page_limit: u32,
}

impl Settings {
    /// defaults, then config files, then the environment, then flags
    pub fn load(args: &ConfigArgs) -> error::Result<Self> {
        let cwd = std::env::current_dir()
            .context("failed to retrieve cwd for Settings")?;
        let mut settings = Settings::try_default()?;

        for config_path in &args.config {
            let full = if config_path.is_absolute() {
                config_path.clone()
            } else {
                cwd.join(config_path)
            };

            tracing::debug!("loading config file \"{}\"", full.display());

            let loaded = load_file(&full)?;
            let src = SrcFile::new(&full)?;
            let dot = DotPath::new(&"settings");

            settings.merge(&src, dot, loaded)?;
        }

        settings.merge_env(|key| std::env::var(key).ok())?;

        if let Some(api_url) = &args.api_url {
            settings.api_url = with_trailing_slash(api_url.clone());
        }

        if let Some(token_file) = &args.token_file {
            settings.token_file = if token_file.is_absolute() {
                token_file.clone()
            } else {
                cwd.join(token_file)
            };
        }

        tracing::debug!("{settings:#?}");

        Ok(settings)
    }

    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath<'_>, settings: shape::Settings) -> error::Result<()> {
        if let Some(api_url) = settings.api_url {
            self.api_url = check_url(&api_url).context(format!(
                "{} invalid: \"{}\" file: {src}", dot.push(&"api_url"), api_url
            ))?;
        }

        if let Some(token_file) = settings.token_file {
            self.token_file = if token_file.is_absolute() {
                token_file
            } else {
                src.parent.join(token_file)
            };
        }

        if let Some(timeout_secs) = settings.timeout_secs {
            self.timeout = check_timeout(timeout_secs).context(format!(
                "{} file: {src}", dot.push(&"timeout_secs")
            ))?;
        }

        if let Some(page_limit) = settings.page_limit {
            self.page_limit = check_page_limit(page_limit).context(format!(
                "{} file: {src}", dot.push(&"page_limit")
            ))?;
        }

        Ok(())
    }

    fn merge_env<F>(&mut self, lookup: F) -> error::Result<()>
    where
        F: Fn(&str) -> Option<String>
    {
        if let Some(api_url) = lookup(ENV_API_URL) {
            self.api_url = check_url(&api_url)
                .context(format!("{ENV_API_URL} invalid: \"{api_url}\""))?;
        }

        if let Some(token_file) = lookup(ENV_TOKEN_FILE) {
            self.token_file = PathBuf::from(token_file);
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            let secs = timeout.trim().parse::<u64>()
                .context(format!("{ENV_TIMEOUT} is not a number: \"{timeout}\""))?;

            self.timeout = check_timeout(secs).context(ENV_TIMEOUT)?;
        }

        Ok(())
    }
}

impl TryDefault for Settings {
    type Error = error::Error;

    fn try_default() -> Result<Self, Self::Error> {
        let cwd = std::env::current_dir()
            .context("failed to retrieve cwd for Settings")?;

        Ok(Settings {
            api_url: check_url(DEFAULT_API_URL).context("invalid default api url")?,
            token_file: cwd.join(DEFAULT_TOKEN_FILE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }
}

fn load_file(path: &Path) -> error::Result<shape::Settings> {
    let ext = path.extension().context(format!(
        "failed to retrieve the file extension for config file: \"{}\"", path.display()
    ))?;

    let ext = ext.to_ascii_lowercase();
    let file = std::fs::OpenOptions::new()
        .read(true)
        .open(path)
        .context(format!("failed to open config file: \"{}\"", path.display()))?;
    let reader = std::io::BufReader::new(file);

    if ext.eq("yaml") || ext.eq("yml") {
        serde_yaml::from_reader(reader).context(format!(
            "failed to parse yaml config file: \"{}\"", path.display()
        ))
    } else if ext.eq("json") {
        serde_json::from_reader(reader).context(format!(
            "failed to parse json config file: \"{}\"", path.display()
        ))
    } else {
        Err(error::Error::new().context(format!(
            "unknown type of config file: \"{}\"", path.display()
        )))
    }
}

struct SrcFile<'a> {
    parent: &'a Path,
    src: &'a Path,
}

impl<'a> SrcFile<'a> {
    fn new(src: &'a Path) -> error::Result<Self> {
        let parent = src.parent().context(format!(
            "failed to retrieve parent path from source file \"{}\"", src.display()
        ))?;

        Ok(SrcFile {
            parent,
            src
        })
    }
}

impl<'a> Display for SrcFile<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.src.display())
    }
}

struct DotPath<'a>(Vec<&'a dyn Display>);

impl<'a> DotPath<'a> {
    fn new(name: &'a (dyn Display)) -> Self {
        DotPath(vec![name])
    }

    fn push(&self, name: &'a (dyn Display)) -> Self {
        let mut path = self.0.clone();
        path.push(name);

        DotPath(path)
    }
}

impl<'a> Display for DotPath<'a> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;

        for name in &self.0 {
            if first {
                write!(fmt, "{name}")?;
                first = false;
            } else {
                write!(fmt, ".{name}")?;
            }
        }

        Ok(())
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());

        url.set_path(&path);
    }

    url
}

fn check_url(given: &str) -> error::Result<Url> {
    let url = Url::parse(given.trim())?;

    match url.scheme() {
        "http" | "https" => Ok(with_trailing_slash(url)),
        scheme => Err(error::Error::new().context(format!(
            "unsupported url scheme \"{scheme}\""
        ))),
    }
}

fn check_timeout(secs: u64) -> error::Result<Duration> {
    if secs == 0 {
        Err(error::Error::new().context("timeout must be greater than 0"))
    } else {
        Ok(Duration::from_secs(secs))
    }
}

fn check_page_limit(limit: u32) -> error::Result<u32> {
    if limit == 0 || limit > MAX_LIMIT {
        Err(error::Error::new().context(format!(
            "page limit must be between 1 and {MAX_LIMIT}"
        )))
    } else {
        Ok(limit)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sekolah-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn args(config: Vec<PathBuf>) -> ConfigArgs {
        ConfigArgs {
            config,
            api_url: None,
            token_file: None,
        }
    }

    #[test]
    fn defaults() {
        let settings = Settings::try_default().unwrap();

        assert!(settings.api_url.path().ends_with('/'));
        assert!(settings.token_file.ends_with(DEFAULT_TOKEN_FILE));
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(settings.page_limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn yaml_file_layers_over_defaults() {
        let path = temp_file("layer.yaml", "api_url: https://sekolah.sch.id/api/v1\npage_limit: 25\ntoken_file: token.json\n");
        let mut settings = Settings::try_default().unwrap();
        let src = SrcFile::new(&path).unwrap();

        settings.merge(&src, DotPath::new(&"settings"), load_file(&path).unwrap()).unwrap();

        assert_eq!(settings.api_url.as_str(), "https://sekolah.sch.id/api/v1/");
        assert_eq!(settings.page_limit, 25);
        assert_eq!(settings.token_file, std::env::temp_dir().join("token.json"));
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn json_file_and_bad_values() {
        let good = temp_file("good.json", r#"{"timeout_secs": 5}"#);
        let zero = temp_file("zero.json", r#"{"timeout_secs": 0}"#);
        let huge = temp_file("huge.json", r#"{"page_limit": 500}"#);
        let scheme = temp_file("scheme.json", r#"{"api_url": "ftp://sekolah.sch.id/"}"#);

        let loaded = Settings::load(&args(vec![good.clone()])).unwrap();
        assert_eq!(loaded.timeout, Duration::from_secs(5));

        for bad in [&zero, &huge, &scheme] {
            assert!(Settings::load(&args(vec![bad.clone()])).is_err(), "{} should fail", bad.display());
        }

        for path in [good, zero, huge, scheme] {
            std::fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn unknown_extension() {
        let path = temp_file("settings.toml", "page_limit = 5");

        assert!(Settings::load(&args(vec![path.clone()])).is_err());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn environment_layer() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://10.0.0.2:3000/api/v1"),
            (ENV_TOKEN_FILE, "/tmp/other.json"),
            (ENV_TIMEOUT, "12"),
        ]);
        let mut settings = Settings::try_default().unwrap();

        settings.merge_env(|key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(settings.api_url.as_str(), "http://10.0.0.2:3000/api/v1/");
        assert_eq!(settings.token_file, PathBuf::from("/tmp/other.json"));
        assert_eq!(settings.timeout, Duration::from_secs(12));

        let mut settings = Settings::try_default().unwrap();
        assert!(settings.merge_env(|key| (key == ENV_TIMEOUT).then(|| "soon".to_owned())).is_err());
    }

    #[test]
    fn flags_win() {
        let mut given = args(Vec::new());
        given.api_url = Some(Url::parse("http://flag.test/api").unwrap());

        let settings = Settings::load(&given).unwrap();

        assert_eq!(settings.api_url.as_str(), "http://flag.test/api/");
    }
}
