mod test_eager_call_flow;
mod test_lazy_call_flow;
mod test_reject_before_media;
