use crate::context::Context;
use crate::error::Error;
use crate::halt::Outcome;
use crate::params::Params;
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Renders one template file against the active context
///
/// Implementations may mutate the response (status, headers) and may halt.
/// The returned string is the template output; the caller decides where it goes.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, path: &Path, ctx: &mut Context, locals: &Params) -> Outcome<String>;
}

/// Default renderer: reads the file and interpolates `{name}` / `{a.b}` placeholders
///
/// Scope, innermost first: locals, then `request`, `params`, `route`, `response`
/// and `format`, then globals registered with [`FileRenderer::set_var`].
/// Unknown placeholders are left as written.
pub struct FileRenderer {
    variables: HashMap<String, Value>,
    escape: bool,
}

impl FileRenderer {
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
            escape: true,
        }
    }

    /// Insert values without HTML escaping
    pub fn without_escaping(mut self) -> Self {
        self.escape = false;
        self
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    fn scope(&self, ctx: &Context, locals: &Params) -> HashMap<String, Value> {
        let mut scope = self.variables.clone();

        let request = &ctx.request;
        let mut request_vars = HashMap::new();
        request_vars.insert("uri".to_string(), Value::from(request.uri.as_str()));
        request_vars.insert("path".to_string(), Value::from(request.path.as_str()));
        request_vars.insert("format".to_string(), Value::from(request.format.as_str()));
        request_vars.insert("method".to_string(), Value::from(request.method.as_str()));
        scope.insert("request".to_string(), Value::Object(request_vars));

        let params: HashMap<String, Value> = request
            .params
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        scope.insert("params".to_string(), Value::Object(params));
        scope.insert("format".to_string(), Value::from(request.format.as_str()));

        if let Some(route) = &ctx.route {
            let mut route_vars = HashMap::new();
            route_vars.insert("pattern".to_string(), Value::from(route.pattern()));
            scope.insert("route".to_string(), Value::Object(route_vars));
        }

        let mut response_vars = HashMap::new();
        if let Some(status) = ctx.response.status() {
            response_vars.insert("status".to_string(), Value::from(status.as_u16()));
        }
        scope.insert("response".to_string(), Value::Object(response_vars));

        for (key, value) in locals.iter() {
            scope.insert(key.to_string(), value.clone());
        }

        scope
    }

    /// Interpolate `content` against a prepared scope
    pub fn interpolate(&self, content: &str, scope: &HashMap<String, Value>) -> String {
        static VAR_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_\.]*)\}").unwrap());

        VAR_REGEX
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                match lookup(scope, name) {
                    Some(value) if self.escape => {
                        html_escape::encode_text(&value.to_string()).into_owned()
                    }
                    Some(value) => value.to_string(),
                    None => format!("{{{}}}", name),
                }
            })
            .to_string()
    }
}

fn lookup<'a>(scope: &'a HashMap<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = scope.get(parts.next()?)?;
    for part in parts {
        match current {
            Value::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

impl Default for FileRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for FileRenderer {
    fn render(&self, path: &Path, ctx: &mut Context, locals: &Params) -> Outcome<String> {
        let content = fs::read_to_string(path).map_err(|source| Error::Render {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("rendering {}", path.display());

        let scope = self.scope(ctx, locals);
        Ok(self.interpolate(&content, &scope))
    }
}
