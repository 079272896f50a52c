use crate::directive::Directive;
use crate::handlers::Automation;
use async_trait::async_trait;

/// Automation backend that only reports what it would have done.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAutomation;

#[async_trait]
impl Automation for LoggingAutomation {
    async fn run(&self, directives: &[Directive]) -> anyhow::Result<()> {
        for directive in directives.iter().filter(|d| d.is_automation()) {
            tracing::info!(
                tag = directive.tag().map(|t| t.prefix()).unwrap_or_default(),
                target = %directive.payload(),
                "automation directive"
            );
        }
        Ok(())
    }
}
