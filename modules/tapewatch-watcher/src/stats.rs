/// Stats from a watch run.
#[derive(Debug, Default)]
pub struct WatchStats {
    pub handles_configured: u32,
    pub accounts_resolved: u32,
    pub resolve_failures: u32,
    pub fetch_failures: u32,
    pub posts_fetched: u32,
    pub posts_new: u32,
    pub notified: u32,
    pub notify_failures: u32,
    pub commentary_requested: u32,
    pub commentary_attached: u32,
}

impl std::fmt::Display for WatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Watch Run Complete ===")?;
        writeln!(f, "Handles configured: {}", self.handles_configured)?;
        writeln!(f, "Accounts resolved:  {}", self.accounts_resolved)?;
        writeln!(f, "Resolve failures:   {}", self.resolve_failures)?;
        writeln!(f, "Fetch failures:     {}", self.fetch_failures)?;
        writeln!(f, "Posts fetched:      {}", self.posts_fetched)?;
        writeln!(f, "Posts new:          {}", self.posts_new)?;
        writeln!(f, "Notified:           {}", self.notified)?;
        writeln!(f, "Notify failures:    {}", self.notify_failures)?;
        if self.commentary_requested > 0 {
            writeln!(f, "\nCommentary:")?;
            writeln!(f, "  Requested: {}", self.commentary_requested)?;
            writeln!(f, "  Attached:  {}", self.commentary_attached)?;
        }
        Ok(())
    }
}
